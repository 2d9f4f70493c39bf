//! JsonLogic scope expressions
//!
//! A resource may carry a scope expression that combines per-scope policy
//! decisions into one boolean:
//!
//! ```json
//! { "rule": { "or": [ { "var": 0 }, { "var": 1 } ] }, "data": ["read", "write"] }
//! ```
//!
//! `data` lists the scope ids in the order their decisions are fed to the
//! rule (`{"var": 0}` is the decision for `data[0]`).

pub mod engine;
pub mod error;
pub mod node;

pub use engine::{apply, truthy};
pub use error::{LogicError, Result};
pub use node::LogicNode;
