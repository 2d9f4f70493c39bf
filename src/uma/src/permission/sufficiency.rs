//! Permission sufficiency check
//!
//! Decides whether the permissions already attached to an RPT cover a
//! request. If they do not, a new permission is registered and the client
//! receives a ticket to exchange for a better RPT.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::registration::PermissionRegistrar;
use super::types::Permission;
use crate::error::Result;
use crate::resource::{ResourceLookup, ResourceType};
use crate::response::{DeniedResponse, TicketResponseBuilder};
use crate::store::ScopeStore;
use crate::types::{Rpt, ScopeId};

/// Outcome of a sufficiency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sufficiency {
    /// A granted permission covers the request
    Allowed,

    /// Access denied; the response must be returned to the caller verbatim
    Denied(DeniedResponse),
}

impl Sufficiency {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Denial response, if access was not allowed
    pub fn denied(&self) -> Option<&DeniedResponse> {
        match self {
            Self::Allowed => None,
            Self::Denied(response) => Some(response),
        }
    }
}

/// Checks RPT permissions against requested scopes
///
/// A request is allowed when any granted permission shares at least one
/// scope with it. Full coverage of the requested scopes is not required.
pub struct SufficiencyChecker {
    lookup: ResourceLookup,
    scopes: Arc<dyn ScopeStore>,
    registrar: PermissionRegistrar,
    responses: TicketResponseBuilder,
}

impl SufficiencyChecker {
    pub fn new(
        lookup: ResourceLookup,
        scopes: Arc<dyn ScopeStore>,
        registrar: PermissionRegistrar,
        responses: TicketResponseBuilder,
    ) -> Self {
        Self {
            lookup,
            scopes,
            registrar,
            responses,
        }
    }

    /// Check `granted` permissions of `rpt` against `requested_scopes`
    ///
    /// # Pipeline
    ///
    /// 1. Resolve the resource for `resource_type` (unresolvable → 500, no ticket)
    /// 2. Map requested scope ids to scope references
    /// 3. Allow on the first permission with any overlapping scope
    /// 4. Otherwise register a permission and answer 403 with its ticket
    ///
    /// # Errors
    ///
    /// Persistence failures while resolving the resource or registering the
    /// ticket are propagated, never retried.
    #[tracing::instrument(skip_all, fields(resource_type = %resource_type, client_id = %rpt.client_id))]
    pub async fn check(
        &self,
        rpt: &Rpt,
        granted: &[Permission],
        resource_type: ResourceType,
        requested_scopes: &[ScopeId],
    ) -> Result<Sufficiency> {
        let resource = self.lookup.get_resource(resource_type).await?;
        if resource.id.is_empty() {
            error!("Resource for type {} has no id, check server configuration", resource_type);
            return Ok(Sufficiency::Denied(DeniedResponse::ResourceUnresolved));
        }

        let requested_refs = self.scopes.get_scope_refs(requested_scopes).await?;
        let requested: HashSet<&str> = requested_refs.iter().map(String::as_str).collect();

        if let Some(permission) = granted.iter().find(|p| p.intersects(&requested)) {
            debug!(
                "Permission {} overlaps requested scopes {:?}, access allowed",
                permission.id, requested_scopes
            );
            return Ok(Sufficiency::Allowed);
        }

        debug!(
            "None of {} granted permissions overlaps {:?}, registering ticket",
            granted.len(),
            requested_scopes
        );

        let ticket = self
            .registrar
            .register_with_refs(rpt, &resource, requested_refs)
            .await?;
        info!("Access denied with insufficient_scope on resource {}", resource.id);

        Ok(Sufficiency::Denied(DeniedResponse::InsufficientScope(
            self.responses.build(ticket),
        )))
    }
}
