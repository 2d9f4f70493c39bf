//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uma_authz::permission::Permission;
use uma_authz::policy::{PolicyScript, PolicyScriptExecutor, ScopedScript, ScriptBinding};
use uma_authz::store::{InMemoryStore, PermissionStore, ResourceStore};
use uma_authz::{Client, Resource, Result, Scope, UmaAuthorizationContext, UmaError};

/// Client id registered by [`store_with_client`]
pub const CLIENT_ID: &str = "rp-client";

/// Route test logs through the test harness; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn store_with_client() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_client(Client::new(CLIENT_ID));
    store
}

/// Executor whose scripts are the literals "true" or "false"
///
/// Records the id of every script it runs, in order.
#[derive(Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PolicyScriptExecutor for ScriptedExecutor {
    fn authorize(&self, script: &PolicyScript, _context: &UmaAuthorizationContext) -> bool {
        self.calls.lock().unwrap().push(script.id.clone());
        script.expression == "true"
    }
}

/// Binding of a literal script to `scope_id`
pub fn binding(scope_id: &str, allow: bool) -> ScriptBinding {
    let script = PolicyScript::new(format!("policy-{}", scope_id), scope_id, allow.to_string());
    ScriptBinding::new(
        ScopedScript::new(Arc::new(script), Scope::new(scope_id)),
        UmaAuthorizationContext::new().for_scope(scope_id),
    )
}

/// Scope references for the given scope ids
pub fn refs(scope_ids: &[&str]) -> Vec<String> {
    scope_ids.iter().map(|id| Scope::dn_for(id)).collect()
}

/// Resource store that counts writes made through it
pub struct CountingResourceStore {
    inner: InMemoryStore,
    adds: AtomicUsize,
    removes: AtomicUsize,
}

impl CountingResourceStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            adds: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
        }
    }

    pub fn adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

#[async_trait]
impl ResourceStore for CountingResourceStore {
    async fn find_resources_by_type(&self, type_name: &str) -> Result<Vec<Resource>> {
        self.inner.find_resources_by_type(type_name).await
    }

    async fn get_resource_by_id(&self, id: &str) -> Result<Option<Resource>> {
        self.inner.get_resource_by_id(id).await
    }

    async fn add_resource(&self, resource: Resource) -> Result<()> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.inner.add_resource(resource).await
    }

    async fn remove_resource(&self, id: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_resource(id).await
    }
}

/// Permission store whose merges always fail
pub struct FailingMergeStore {
    inner: InMemoryStore,
    merges: AtomicUsize,
}

impl FailingMergeStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            merges: AtomicUsize::new(0),
        }
    }

    pub fn merges(&self) -> usize {
        self.merges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for FailingMergeStore {
    async fn add_permission_for_client(&self, client: &Client, permission: Permission) -> Result<()> {
        self.inner.add_permission_for_client(client, permission).await
    }

    async fn merge_permission(&self, _permission: &Permission) -> Result<()> {
        self.merges.fetch_add(1, Ordering::SeqCst);
        Err(UmaError::Persistence("directory unavailable".to_string()))
    }

    async fn get_permissions_by_ticket(&self, ticket: &str) -> Result<Vec<Permission>> {
        self.inner.get_permissions_by_ticket(ticket).await
    }
}

/// Resource store whose type lookups always fail
pub struct UnreachableResourceStore;

#[async_trait]
impl ResourceStore for UnreachableResourceStore {
    async fn find_resources_by_type(&self, _type_name: &str) -> Result<Vec<Resource>> {
        Err(UmaError::Persistence("resource branch unreachable".to_string()))
    }

    async fn get_resource_by_id(&self, _id: &str) -> Result<Option<Resource>> {
        Err(UmaError::Persistence("resource branch unreachable".to_string()))
    }

    async fn add_resource(&self, _resource: Resource) -> Result<()> {
        Err(UmaError::Persistence("resource branch unreachable".to_string()))
    }

    async fn remove_resource(&self, _id: &str) -> Result<()> {
        Err(UmaError::Persistence("resource branch unreachable".to_string()))
    }
}

/// Permission store that rejects new permissions
pub struct RejectingPermissionStore {
    inner: InMemoryStore,
}

impl RejectingPermissionStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PermissionStore for RejectingPermissionStore {
    async fn add_permission_for_client(&self, _client: &Client, _permission: Permission) -> Result<()> {
        Err(UmaError::Persistence("permission branch is read-only".to_string()))
    }

    async fn merge_permission(&self, permission: &Permission) -> Result<()> {
        self.inner.merge_permission(permission).await
    }

    async fn get_permissions_by_ticket(&self, ticket: &str) -> Result<Vec<Permission>> {
        self.inner.get_permissions_by_ticket(ticket).await
    }
}
