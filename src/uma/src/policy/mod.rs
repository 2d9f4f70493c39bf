//! Policy scripts bound to scopes and their evaluation over permissions

pub mod evaluator;
pub mod registry;
pub mod script;

pub use evaluator::{Granted, ScopePolicyEvaluator};
pub use registry::ScriptRegistry;
pub use script::{PolicyScript, PolicyScriptExecutor, ScopedScript, ScriptBinding};
