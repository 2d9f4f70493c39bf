//! CEL policy script executor

use cel_interpreter::objects::Value as CelValue;
use cel_interpreter::{Context, Program};
use tracing::{debug, warn};

use crate::cel::{
    context::EvalContext,
    convert::json_to_cel,
    error::{CelError, Result},
};
use crate::policy::{PolicyScript, PolicyScriptExecutor};
use crate::types::UmaAuthorizationContext;

/// Runs policy scripts written in CEL
///
/// Scripts are compiled on every call; nothing is cached between requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelScriptExecutor;

impl CelScriptExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Compile a CEL expression
    ///
    /// # Errors
    /// Returns error if expression cannot be compiled
    pub fn compile(&self, expr: &str) -> Result<Program> {
        Program::compile(expr).map_err(|e| CelError::CompilationError(format!("{:?}", e)))
    }

    /// Evaluate a compiled program with the given context
    ///
    /// # Errors
    /// Returns error if evaluation fails or result is not boolean
    pub fn evaluate(&self, program: &Program, ctx: &EvalContext) -> Result<bool> {
        let mut cel_context = Context::default();
        for (key, value) in ctx.to_variables() {
            cel_context.add_variable_from_value(key, json_to_cel(&value));
        }

        let result = program
            .execute(&cel_context)
            .map_err(|e| CelError::EvaluationError(format!("{:?}", e)))?;

        Self::to_bool(&result)
    }

    /// Compile and evaluate an expression in one call
    pub fn evaluate_expression(&self, expr: &str, ctx: &EvalContext) -> Result<bool> {
        let program = self.compile(expr)?;
        self.evaluate(&program, ctx)
    }

    fn to_bool(value: &CelValue) -> Result<bool> {
        match value {
            CelValue::Bool(b) => Ok(*b),
            _ => Err(CelError::NonBooleanResult),
        }
    }
}

impl PolicyScriptExecutor for CelScriptExecutor {
    fn authorize(&self, script: &PolicyScript, context: &UmaAuthorizationContext) -> bool {
        match self.evaluate_expression(&script.expression, &EvalContext::from(context)) {
            Ok(allowed) => {
                debug!("Policy script {} returned {}", script.id, allowed);
                allowed
            }
            Err(e) => {
                warn!("Policy script {} ({}) failed: {}", script.id, script.name, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_context() -> UmaAuthorizationContext {
        UmaAuthorizationContext::new()
            .with_claim("country", json!("US"))
            .with_claim("roles", json!(["admin", "editor"]))
            .with_claim("age", json!(30))
            .with_client("rp-1")
            .with_resource("r1")
            .for_scope("read")
    }

    fn script(expression: &str) -> PolicyScript {
        PolicyScript::new("p1", "test", expression)
    }

    #[test]
    fn test_simple_expression() {
        let executor = CelScriptExecutor::new();
        let ctx = EvalContext::from(&create_test_context());

        assert!(executor.evaluate_expression("true", &ctx).unwrap());
        assert!(!executor.evaluate_expression("false", &ctx).unwrap());
    }

    #[test]
    fn test_claim_access() {
        let executor = CelScriptExecutor::new();
        let ctx = create_test_context();

        assert!(executor.authorize(&script("claims.country == 'US'"), &ctx));
        assert!(executor.authorize(&script("'admin' in claims.roles"), &ctx));
        assert!(!executor.authorize(&script("'viewer' in claims.roles"), &ctx));
        assert!(executor.authorize(&script("claims.age >= 18"), &ctx));
    }

    #[test]
    fn test_context_variables() {
        let executor = CelScriptExecutor::new();
        let ctx = create_test_context();

        assert!(executor.authorize(&script("scope == 'read' && client == 'rp-1'"), &ctx));
        assert!(executor.authorize(&script("resource == 'r1'"), &ctx));
    }

    #[test]
    fn test_compilation_error() {
        let executor = CelScriptExecutor::new();
        let result = executor.compile("invalid syntax @#$");
        assert!(matches!(result, Err(CelError::CompilationError(_))));
    }

    #[test]
    fn test_evaluation_error() {
        let executor = CelScriptExecutor::new();
        let ctx = EvalContext::from(&create_test_context());
        let result = executor.evaluate_expression("claims.missing == 1", &ctx);
        assert!(matches!(result, Err(CelError::EvaluationError(_))));
    }

    #[test]
    fn test_non_boolean_result() {
        let executor = CelScriptExecutor::new();
        let result = executor.evaluate_expression("'hello'", &EvalContext::new());
        assert!(matches!(result, Err(CelError::NonBooleanResult)));
    }

    #[test]
    fn test_failures_deny() {
        let executor = CelScriptExecutor::new();
        let ctx = create_test_context();

        assert!(!executor.authorize(&script("invalid syntax @#$"), &ctx));
        assert!(!executor.authorize(&script("'hello'"), &ctx));
        assert!(!executor.authorize(&script("claims.missing == 1"), &ctx));
    }
}
