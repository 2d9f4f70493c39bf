//! Evaluation context for CEL policy scripts

use serde_json::Value;
use std::collections::HashMap;

use crate::types::UmaAuthorizationContext;

/// Variables available to a policy script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalContext {
    /// Requesting party claims
    pub claims: HashMap<String, Value>,

    /// Requesting client id
    pub client: Option<String>,

    /// Resource id
    pub resource: Option<String>,

    /// Scope id the script runs for
    pub scope: Option<String>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all variables as a flat map for CEL evaluation
    ///
    /// Absent values are bound as `null` so scripts can test for them.
    pub fn to_variables(&self) -> HashMap<String, Value> {
        let optional = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);

        let mut vars = HashMap::with_capacity(4);
        vars.insert(
            "claims".to_string(),
            Value::Object(self.claims.clone().into_iter().collect()),
        );
        vars.insert("client".to_string(), optional(&self.client));
        vars.insert("resource".to_string(), optional(&self.resource));
        vars.insert("scope".to_string(), optional(&self.scope));
        vars
    }
}

impl From<&UmaAuthorizationContext> for EvalContext {
    fn from(ctx: &UmaAuthorizationContext) -> Self {
        Self {
            claims: ctx.claims.clone(),
            client: ctx.client_id.clone(),
            resource: ctx.resource_id.clone(),
            scope: ctx.scope_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eval_context_creation() {
        let ctx = EvalContext::new();
        assert!(ctx.claims.is_empty());
        assert!(ctx.client.is_none());
    }

    #[test]
    fn test_from_authorization_context() {
        let uma = UmaAuthorizationContext::new()
            .with_claim("country", json!("US"))
            .with_client("rp-1")
            .with_resource("r1")
            .for_scope("read");

        let ctx = EvalContext::from(&uma);
        assert_eq!(ctx.claims.get("country"), Some(&json!("US")));
        assert_eq!(ctx.client.as_deref(), Some("rp-1"));
        assert_eq!(ctx.resource.as_deref(), Some("r1"));
        assert_eq!(ctx.scope.as_deref(), Some("read"));
    }

    #[test]
    fn test_to_variables_binds_nulls() {
        let vars = EvalContext::new().to_variables();
        assert_eq!(vars.len(), 4);
        assert_eq!(vars.get("claims"), Some(&json!({})));
        assert_eq!(vars.get("client"), Some(&Value::Null));
        assert_eq!(vars.get("scope"), Some(&Value::Null));
    }
}
