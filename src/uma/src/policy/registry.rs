//! Scope to policy script table

use std::collections::HashMap;
use std::sync::Arc;

use super::script::{PolicyScript, ScopedScript, ScriptBinding};
use crate::scope::Scope;
use crate::types::{ScopeId, UmaAuthorizationContext};

/// Read-only table of the policy scripts bound to each scope
///
/// Built once at start-up and handed to whoever prepares evaluations.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    scripts: HashMap<ScopeId, Vec<Arc<PolicyScript>>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `script` to `scope_id`, keeping registration order
    pub fn with_script(mut self, scope_id: impl Into<ScopeId>, script: PolicyScript) -> Self {
        self.scripts
            .entry(scope_id.into())
            .or_default()
            .push(Arc::new(script));
        self
    }

    /// Scripts bound to `scope_id`
    pub fn scripts_for(&self, scope_id: &str) -> &[Arc<PolicyScript>] {
        self.scripts
            .get(scope_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of scopes with at least one script
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Pair every script bound to `scopes` with a per-scope copy of `context`
    ///
    /// Scopes are visited in the given order; scripts of one scope keep their
    /// registration order.
    pub fn bind(&self, scopes: &[Scope], context: &UmaAuthorizationContext) -> Vec<ScriptBinding> {
        scopes
            .iter()
            .flat_map(|scope| {
                self.scripts_for(&scope.id).iter().map(move |script| {
                    ScriptBinding::new(
                        ScopedScript::new(Arc::clone(script), scope.clone()),
                        context.for_scope(scope.id.clone()),
                    )
                })
            })
            .collect()
    }
}
