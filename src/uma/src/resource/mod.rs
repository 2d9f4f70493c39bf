//! Protected resources and their lookup

mod lookup;
mod types;

pub use lookup::ResourceLookup;
pub use types::{Resource, ResourceType};
