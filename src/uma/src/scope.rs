//! UMA scope records
//!
//! A scope is a named unit of authorization attached to a resource. The
//! engine only reads scopes: it maps ids to persistence handles and back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ScopeId, ScopeRef};

/// Scope as persisted by the authorization server
///
/// # Examples
///
/// ```
/// use uma_authz::scope::Scope;
///
/// let scope = Scope::new("read");
/// assert_eq!(scope.id, "read");
/// assert_eq!(scope.dn, "inum=read,ou=scopes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Stable scope identifier
    pub id: ScopeId,

    /// Persistence handle (DN), stored on permissions
    pub dn: ScopeRef,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Scope {
    /// Create a scope whose handle is derived from its id
    pub fn new(id: impl Into<ScopeId>) -> Self {
        let id = id.into();
        let dn = Self::dn_for(&id);
        Self {
            id,
            dn,
            display_name: None,
        }
    }

    /// Create a scope with an explicit persistence handle
    pub fn with_dn(id: impl Into<ScopeId>, dn: impl Into<ScopeRef>) -> Self {
        Self {
            id: id.into(),
            dn: dn.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Handle assigned to scopes registered without an explicit one
    pub fn dn_for(id: &str) -> ScopeRef {
        format!("inum={},ou=scopes", id)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
