//! Policy scripts and the script execution capability

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::scope::Scope;
use crate::types::UmaAuthorizationContext;

/// Authorization policy script bound to one or more scopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyScript {
    /// Unique script identifier
    pub id: String,

    /// Script name (for logs)
    pub name: String,

    /// Script source, interpreted by the configured executor
    pub expression: String,
}

impl PolicyScript {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// A script together with the scope it guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedScript {
    pub script: Arc<PolicyScript>,
    pub scope: Scope,
}

impl ScopedScript {
    pub fn new(script: Arc<PolicyScript>, scope: Scope) -> Self {
        Self { script, scope }
    }
}

/// A scoped script and the context it is evaluated with
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBinding {
    pub scoped: ScopedScript,
    pub context: UmaAuthorizationContext,
}

impl ScriptBinding {
    pub fn new(scoped: ScopedScript, context: UmaAuthorizationContext) -> Self {
        Self { scoped, context }
    }

    /// Scope id guarded by this binding
    pub fn scope_id(&self) -> &str {
        &self.scoped.scope.id
    }

    /// Scope reference guarded by this binding
    pub fn scope_ref(&self) -> &str {
        &self.scoped.scope.dn
    }
}

/// Executes policy scripts
///
/// Execution is synchronous and expected to be side-effect free. The
/// evaluator imposes no timeout; wrap slow implementations at the caller.
pub trait PolicyScriptExecutor: Send + Sync {
    /// Run `script` against `context`
    ///
    /// # Returns
    ///
    /// `true` if the script grants access. Script failures must be reported
    /// as `false`.
    fn authorize(&self, script: &PolicyScript, context: &UmaAuthorizationContext) -> bool;
}
