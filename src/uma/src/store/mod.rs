//! Persistence boundary
//!
//! The engine never talks to a database directly. It consumes these traits,
//! relying on the backing store for atomicity of single create/merge
//! operations. [`InMemoryStore`] implements all of them.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::permission::Permission;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::types::{Client, ScopeId, ScopeRef};

/// Resource persistence
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Resources tagged with the given type name, in storage order
    async fn find_resources_by_type(&self, type_name: &str) -> Result<Vec<Resource>>;

    /// Get a resource by ID
    async fn get_resource_by_id(&self, id: &str) -> Result<Option<Resource>>;

    /// Store a resource
    async fn add_resource(&self, resource: Resource) -> Result<()>;

    /// Delete a resource
    async fn remove_resource(&self, id: &str) -> Result<()>;
}

/// Scope persistence
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Persistence handles for the given scope ids, in request order
    ///
    /// Ids that are not registered yet are registered on the fly.
    async fn get_scope_refs(&self, scope_ids: &[ScopeId]) -> Result<Vec<ScopeRef>>;

    /// Get a scope by ID
    async fn get_scope(&self, scope_id: &str) -> Result<Option<Scope>>;
}

/// Permission persistence
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Persist a new permission owned by `client`
    async fn add_permission_for_client(&self, client: &Client, permission: Permission) -> Result<()>;

    /// Overwrite a persisted permission with the given state
    async fn merge_permission(&self, permission: &Permission) -> Result<()>;

    /// Permissions registered under a ticket
    async fn get_permissions_by_ticket(&self, ticket: &str) -> Result<Vec<Permission>>;
}

/// Client lookup
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn get_client_by_id(&self, client_id: &str) -> Result<Option<Client>>;
}
