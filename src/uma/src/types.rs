//! Core UMA types shared across the engine

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Stable scope identifier (e.g., "scim_read")
pub type ScopeId = String;

/// Location-independent scope handle used by persistence (a DN)
pub type ScopeRef = String;

/// Opaque resource identifier
pub type ResourceId = String;

/// Opaque permission ticket handed to requesting clients
pub type Ticket = String;

/// Registered OAuth client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier (client_id)
    pub id: String,

    /// Persistence handle of the client entry
    pub dn: String,

    /// Disabled clients cannot own new permissions
    #[serde(default)]
    pub disabled: bool,
}

impl Client {
    /// Create a client with a derived persistence handle
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let dn = format!("inum={},ou=clients", id);
        Self {
            id,
            dn,
            disabled: false,
        }
    }
}

/// Requesting Party Token together with the client that obtained it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rpt {
    /// Opaque token string
    pub token: String,

    /// Client that obtained the token
    pub client_id: String,
}

impl Rpt {
    pub fn new(token: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client_id: client_id.into(),
        }
    }
}

/// Per-request context handed to policy scripts
///
/// Built by the caller. The engine passes it through to the
/// [`PolicyScriptExecutor`](crate::policy::PolicyScriptExecutor) untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UmaAuthorizationContext {
    /// Claims gathered for the requesting party
    #[serde(default)]
    pub claims: HashMap<String, Value>,

    /// Requesting client id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Resource the permission targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,

    /// Scope the script is being evaluated for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<ScopeId>,
}

impl UmaAuthorizationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.claims.insert(name.into(), value);
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_resource(mut self, resource_id: impl Into<ResourceId>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Copy of this context narrowed to one scope
    pub fn for_scope(&self, scope_id: impl Into<ScopeId>) -> Self {
        let mut ctx = self.clone();
        ctx.scope_id = Some(scope_id.into());
        ctx
    }
}
