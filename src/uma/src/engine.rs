//! UMA engine facade
//!
//! Wires configuration, persistence, the policy script executor and the
//! script registry into one entry point.
//!
//! # Architecture
//!
//! ```text
//! check_sufficiency:    ResourceLookup → SufficiencyChecker ─(deny)→ PermissionRegistrar → TicketResponse
//! evaluate_permissions: ScriptRegistry::bind → ScopePolicyEvaluator ─(narrowed)→ PermissionStore::merge
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::config::UmaConfig;
use crate::error::{Result, UmaError};
use crate::permission::{Permission, PermissionRegistrar, Sufficiency, SufficiencyChecker};
use crate::policy::{PolicyScriptExecutor, ScopePolicyEvaluator, ScriptRegistry};
use crate::resource::{Resource, ResourceLookup, ResourceType};
use crate::response::TicketResponseBuilder;
use crate::scope::Scope;
use crate::store::{ClientStore, PermissionStore, ResourceStore, ScopeStore};
use crate::types::{Rpt, ScopeId, Ticket, UmaAuthorizationContext};
use crate::validation::UmaValidator;

/// Persistence capabilities consumed by the engine
#[derive(Clone)]
pub struct UmaStores {
    pub resources: Arc<dyn ResourceStore>,
    pub scopes: Arc<dyn ScopeStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub clients: Arc<dyn ClientStore>,
}

impl UmaStores {
    /// Use one backend for every capability
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ResourceStore + ScopeStore + PermissionStore + ClientStore + 'static,
    {
        Self {
            resources: store.clone(),
            scopes: store.clone(),
            permissions: store.clone(),
            clients: store,
        }
    }
}

/// UMA permission and policy engine
pub struct UmaEngine {
    config: UmaConfig,
    scopes: Arc<dyn ScopeStore>,
    lookup: ResourceLookup,
    registrar: PermissionRegistrar,
    checker: SufficiencyChecker,
    evaluator: ScopePolicyEvaluator,
    registry: ScriptRegistry,
    validator: UmaValidator,
}

impl UmaEngine {
    /// Create an engine
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration
    /// * `stores` - Persistence backends
    /// * `executor` - Policy script executor
    /// * `registry` - Scripts bound to each scope
    pub fn new(
        config: UmaConfig,
        stores: UmaStores,
        executor: Arc<dyn PolicyScriptExecutor>,
        registry: ScriptRegistry,
    ) -> Self {
        let lookup = ResourceLookup::new(stores.resources.clone());
        let registrar = PermissionRegistrar::new(
            stores.scopes.clone(),
            stores.permissions.clone(),
            stores.clients.clone(),
            config.ticket_lifetime(),
        );
        let checker = SufficiencyChecker::new(
            lookup.clone(),
            stores.scopes.clone(),
            registrar.clone(),
            TicketResponseBuilder::from_config(&config),
        );
        let evaluator = ScopePolicyEvaluator::new(
            stores.resources.clone(),
            stores.permissions.clone(),
            executor,
        )
        .with_grant_access_if_no_policies(config.grant_access_if_no_policies);
        let validator = UmaValidator::new(stores.permissions);

        debug!(
            "UMA engine ready (issuer: {}, ticket lifetime: {}s, {} scopes with policies)",
            config.issuer,
            config.ticket_lifetime().num_seconds(),
            registry.len()
        );

        Self {
            config,
            scopes: stores.scopes,
            lookup,
            registrar,
            checker,
            evaluator,
            registry,
            validator,
        }
    }

    pub fn config(&self) -> &UmaConfig {
        &self.config
    }

    pub fn validator(&self) -> &UmaValidator {
        &self.validator
    }

    /// Resolve the internal resource of `resource_type`
    pub async fn get_resource(&self, resource_type: ResourceType) -> Result<Resource> {
        self.lookup.get_resource(resource_type).await
    }

    /// Check whether `granted` permissions of `rpt` cover `requested_scopes`
    pub async fn check_sufficiency(
        &self,
        rpt: &Rpt,
        granted: &[Permission],
        resource_type: ResourceType,
        requested_scopes: &[ScopeId],
    ) -> Result<Sufficiency> {
        self.checker
            .check(rpt, granted, resource_type, requested_scopes)
            .await
    }

    /// Register a permission for `requested_scopes` on the resource of `resource_type`
    pub async fn register_permission(
        &self,
        rpt: &Rpt,
        resource_type: ResourceType,
        requested_scopes: &[ScopeId],
    ) -> Result<Ticket> {
        let resource = self.lookup.get_resource(resource_type).await?;
        self.registrar
            .register(rpt, &resource, requested_scopes)
            .await
    }

    /// Run the policy scripts of `scope_ids` over `permissions`
    ///
    /// Permissions are narrowed in place when a scope expression grants
    /// access despite failing scopes.
    ///
    /// # Errors
    ///
    /// `InvalidScope` for an unregistered scope id, `ForbiddenByPolicy` when
    /// a permission is refused.
    pub async fn evaluate_permissions(
        &self,
        scope_ids: &[ScopeId],
        context: &UmaAuthorizationContext,
        permissions: &mut [Permission],
    ) -> Result<()> {
        let mut scopes: Vec<Scope> = Vec::with_capacity(scope_ids.len());
        for scope_id in scope_ids {
            let scope = self
                .scopes
                .get_scope(scope_id)
                .await?
                .ok_or_else(|| UmaError::InvalidScope(format!("scope {} is not registered", scope_id)))?;
            scopes.push(scope);
        }

        let bindings = self.registry.bind(&scopes, context);
        self.evaluator.evaluate(&bindings, permissions).await
    }
}
