//! Permissions, ticket registration and the sufficiency check

mod registration;
mod sufficiency;
mod types;

pub use registration::PermissionRegistrar;
pub use sufficiency::{Sufficiency, SufficiencyChecker};
pub use types::{Permission, PermissionStatus};
