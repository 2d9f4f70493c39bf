//! Permission ticket registration

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

use super::types::Permission;
use crate::error::{Result, UmaError};
use crate::resource::Resource;
use crate::store::{ClientStore, PermissionStore, ScopeStore};
use crate::types::{Rpt, ScopeId, ScopeRef, Ticket};

/// Registers permissions and hands back their tickets
#[derive(Clone)]
pub struct PermissionRegistrar {
    scopes: Arc<dyn ScopeStore>,
    permissions: Arc<dyn PermissionStore>,
    clients: Arc<dyn ClientStore>,
    lifetime: Duration,
}

impl PermissionRegistrar {
    /// Create a registrar issuing permissions valid for `lifetime`
    ///
    /// `lifetime` must already be positive; see
    /// [`UmaConfig::ticket_lifetime`](crate::config::UmaConfig::ticket_lifetime).
    pub fn new(
        scopes: Arc<dyn ScopeStore>,
        permissions: Arc<dyn PermissionStore>,
        clients: Arc<dyn ClientStore>,
        lifetime: Duration,
    ) -> Self {
        Self {
            scopes,
            permissions,
            clients,
            lifetime,
        }
    }

    /// Register a permission for `requested_scopes` on `resource`
    ///
    /// # Returns
    ///
    /// The ticket of the newly persisted permission
    ///
    /// # Errors
    ///
    /// `ClientNotFound` if the RPT's client is unknown and `DisabledClient` if
    /// it is disabled (nothing is persisted in either case); persistence
    /// errors are propagated.
    pub async fn register(
        &self,
        rpt: &Rpt,
        resource: &Resource,
        requested_scopes: &[ScopeId],
    ) -> Result<Ticket> {
        let scope_refs = self.scopes.get_scope_refs(requested_scopes).await?;
        self.register_with_refs(rpt, resource, scope_refs).await
    }

    /// Same as [`register`](Self::register) with already resolved scope references
    #[tracing::instrument(skip_all, fields(resource_id = %resource.id))]
    pub async fn register_with_refs(
        &self,
        rpt: &Rpt,
        resource: &Resource,
        scope_refs: Vec<ScopeRef>,
    ) -> Result<Ticket> {
        let expires_at = Utc::now() + self.lifetime;
        let permission = Permission::new(resource.id.clone(), scope_refs, expires_at);

        let client = self
            .clients
            .get_client_by_id(&rpt.client_id)
            .await?
            .ok_or_else(|| {
                error!("Unable to find client {} owning the RPT", rpt.client_id);
                UmaError::ClientNotFound(rpt.client_id.clone())
            })?;

        if client.disabled {
            error!("Client {} owning the RPT is disabled", client.id);
            return Err(UmaError::DisabledClient(client.id));
        }

        let ticket = permission.ticket.clone();
        self.permissions
            .add_permission_for_client(&client, permission)
            .await?;

        info!(
            "Registered permission ticket for client {} on resource {}, expires at {}",
            client.id, resource.id, expires_at
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::Client;

    fn registrar(store: &Arc<InMemoryStore>) -> PermissionRegistrar {
        PermissionRegistrar::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Duration::seconds(3600),
        )
    }

    #[tokio::test]
    async fn test_register_persists_permission() {
        let store = Arc::new(InMemoryStore::new());
        store.add_client(Client::new("rp"));
        let resource = Resource::new("r1", "Docs").with_scopes(["read", "write"]);

        let ticket = registrar(&store)
            .register(&Rpt::new("rpt-1", "rp"), &resource, &["read".to_string()])
            .await
            .unwrap();

        let stored = store.get_permissions_by_ticket(&ticket).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].resource_id, "r1");
        assert_eq!(stored[0].scope_refs, vec!["inum=read,ou=scopes"]);
        assert_eq!(store.permissions_for_client("rp").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_client_creates_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let resource = Resource::new("r1", "Docs");

        let result = registrar(&store)
            .register(&Rpt::new("rpt-1", "ghost"), &resource, &["read".to_string()])
            .await;

        assert!(matches!(result, Err(UmaError::ClientNotFound(id)) if id == "ghost"));
        assert_eq!(store.permission_count().await, 0);
    }

    #[tokio::test]
    async fn test_disabled_client_creates_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let mut client = Client::new("dis");
        client.disabled = true;
        store.add_client(client);
        let resource = Resource::new("r1", "Docs");

        let result = registrar(&store)
            .register(&Rpt::new("rpt-1", "dis"), &resource, &["read".to_string()])
            .await;

        assert!(matches!(result, Err(UmaError::DisabledClient(id)) if id == "dis"));
        assert_eq!(store.permission_count().await, 0);
        assert!(store.permissions_for_client("dis").await.is_empty());
    }
}
