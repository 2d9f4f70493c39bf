//! Permission records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::types::{ResourceId, ScopeRef, Ticket};

/// Lifecycle status of a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Registered for a ticket, not yet exchanged
    Registered,
    /// Exchanged for an RPT
    Accessed,
    /// Revoked
    Invalidated,
}

/// Server-side permission bound to one resource and a set of scopes
///
/// Scope references are set at creation and only ever shrink afterwards
/// (policy narrowing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission identifier
    pub id: String,

    /// Ticket returned to the requesting party
    pub ticket: Ticket,

    /// Resource the permission is bound to
    pub resource_id: ResourceId,

    /// Granted scope references
    pub scope_refs: Vec<ScopeRef>,

    /// Expiration time
    pub expires_at: DateTime<Utc>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Lifecycle status
    pub status: PermissionStatus,
}

impl Permission {
    /// Create a permission with a freshly minted id and ticket
    pub fn new(
        resource_id: impl Into<ResourceId>,
        scope_refs: Vec<ScopeRef>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket: Uuid::new_v4().to_string(),
            resource_id: resource_id.into(),
            scope_refs,
            expires_at,
            created_at: Utc::now(),
            status: PermissionStatus::Registered,
        }
    }

    /// Whether the permission has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_invalidated(&self) -> bool {
        self.status == PermissionStatus::Invalidated
    }

    /// Whether any of the permission's scopes is in `requested`
    pub fn intersects(&self, requested: &HashSet<&str>) -> bool {
        self.scope_refs.iter().any(|r| requested.contains(r.as_str()))
    }

    /// Drop the given scope references in place, returning the ones removed
    pub fn narrow(&mut self, failed: &HashSet<ScopeRef>) -> Vec<ScopeRef> {
        let (removed, kept): (Vec<ScopeRef>, Vec<ScopeRef>) = self
            .scope_refs
            .drain(..)
            .partition(|r| failed.contains(r));
        self.scope_refs = kept;
        removed
    }
}
