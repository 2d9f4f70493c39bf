//! CEL (Common Expression Language) policy scripts
//!
//! The built-in [`PolicyScriptExecutor`](crate::policy::PolicyScriptExecutor):
//! every policy script is a CEL expression evaluated against the
//! authorization context.
//!
//! | Variable   | Contents                                  |
//! |------------|-------------------------------------------|
//! | `claims`   | Requesting party claims (map)             |
//! | `client`   | Requesting client id, or `null`           |
//! | `resource` | Resource id, or `null`                    |
//! | `scope`    | Scope the script is evaluated for, or `null` |

pub mod context;
pub mod convert;
pub mod engine;
pub mod error;

pub use context::EvalContext;
pub use engine::CelScriptExecutor;
pub use error::{CelError, Result};
