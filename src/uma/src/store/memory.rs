//! In-memory persistence used for tests, benchmarks and embedding

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ClientStore, PermissionStore, ResourceStore, ScopeStore};
use crate::error::{Result, UmaError};
use crate::permission::Permission;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::types::{Client, ScopeId, ScopeRef};

/// Permission together with the client that owns it
#[derive(Debug, Clone)]
struct StoredPermission {
    client_id: String,
    permission: Permission,
}

/// In-memory implementation of every store trait
///
/// Resources and permissions keep insertion order so that lookups return
/// records the way a directory listing would.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    resources: Arc<RwLock<Vec<Resource>>>,
    permissions: Arc<RwLock<Vec<StoredPermission>>>,
    scopes: Arc<DashMap<ScopeId, Scope>>,
    clients: Arc<DashMap<String, Client>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scope
    pub fn add_scope(&self, scope: Scope) {
        self.scopes.insert(scope.id.clone(), scope);
    }

    /// Register a client
    pub fn add_client(&self, client: Client) {
        self.clients.insert(client.id.clone(), client);
    }

    /// All persisted resources, in storage order
    pub async fn resources(&self) -> Vec<Resource> {
        self.resources.read().await.clone()
    }

    /// Permissions owned by a client, in creation order
    pub async fn permissions_for_client(&self, client_id: &str) -> Vec<Permission> {
        self.permissions
            .read()
            .await
            .iter()
            .filter(|p| p.client_id == client_id)
            .map(|p| p.permission.clone())
            .collect()
    }

    /// Get a persisted permission by its id
    pub async fn permission(&self, id: &str) -> Option<Permission> {
        self.permissions
            .read()
            .await
            .iter()
            .find(|p| p.permission.id == id)
            .map(|p| p.permission.clone())
    }

    /// Total number of persisted permissions
    pub async fn permission_count(&self) -> usize {
        self.permissions.read().await.len()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn find_resources_by_type(&self, type_name: &str) -> Result<Vec<Resource>> {
        let resources = self.resources.read().await;
        Ok(resources
            .iter()
            .filter(|r| r.resource_type.as_deref() == Some(type_name))
            .cloned()
            .collect())
    }

    async fn get_resource_by_id(&self, id: &str) -> Result<Option<Resource>> {
        let resources = self.resources.read().await;
        Ok(resources.iter().find(|r| r.id == id).cloned())
    }

    async fn add_resource(&self, resource: Resource) -> Result<()> {
        let mut resources = self.resources.write().await;
        if resources.iter().any(|r| r.id == resource.id) {
            return Err(UmaError::Persistence(format!(
                "Resource already exists: {}",
                resource.id
            )));
        }
        resources.push(resource);
        Ok(())
    }

    async fn remove_resource(&self, id: &str) -> Result<()> {
        let mut resources = self.resources.write().await;
        resources.retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl ScopeStore for InMemoryStore {
    async fn get_scope_refs(&self, scope_ids: &[ScopeId]) -> Result<Vec<ScopeRef>> {
        let refs = scope_ids
            .iter()
            .map(|id| {
                self.scopes
                    .entry(id.clone())
                    .or_insert_with(|| {
                        debug!("Registering scope on first use: {}", id);
                        Scope::new(id.clone())
                    })
                    .dn
                    .clone()
            })
            .collect();
        Ok(refs)
    }

    async fn get_scope(&self, scope_id: &str) -> Result<Option<Scope>> {
        Ok(self.scopes.get(scope_id).map(|s| s.clone()))
    }
}

#[async_trait]
impl PermissionStore for InMemoryStore {
    async fn add_permission_for_client(&self, client: &Client, permission: Permission) -> Result<()> {
        let mut permissions = self.permissions.write().await;
        permissions.push(StoredPermission {
            client_id: client.id.clone(),
            permission,
        });
        Ok(())
    }

    async fn merge_permission(&self, permission: &Permission) -> Result<()> {
        let mut permissions = self.permissions.write().await;
        let stored = permissions
            .iter_mut()
            .find(|p| p.permission.id == permission.id)
            .ok_or_else(|| {
                UmaError::Persistence(format!("Permission not found: {}", permission.id))
            })?;
        stored.permission = permission.clone();
        Ok(())
    }

    async fn get_permissions_by_ticket(&self, ticket: &str) -> Result<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        Ok(permissions
            .iter()
            .filter(|p| p.permission.ticket == ticket)
            .map(|p| p.permission.clone())
            .collect())
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn get_client_by_id(&self, client_id: &str) -> Result<Option<Client>> {
        Ok(self.clients.get(client_id).map(|c| c.clone()))
    }
}
