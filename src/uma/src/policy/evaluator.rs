//! Scope policy evaluation
//!
//! Confirms each permission attached to an RPT against the policy scripts of
//! its scopes. Resources without a scope expression require every relevant
//! script to pass. Resources with a JsonLogic scope expression combine the
//! per-scope results through the rule and, when access is granted, drop the
//! scopes whose scripts failed from the permission.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::script::{PolicyScriptExecutor, ScriptBinding};
use crate::error::{Result, UmaError};
use crate::logic::{self, LogicNode};
use crate::permission::Permission;
use crate::store::{PermissionStore, ResourceStore};
use crate::types::ScopeRef;

/// Successful evaluation of one permission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Granted {
    /// Scope references removed from the permission by narrowing
    pub removed: Vec<ScopeRef>,
}

impl Granted {
    pub fn was_narrowed(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Evaluates policy scripts over RPT permissions
pub struct ScopePolicyEvaluator {
    resources: Arc<dyn ResourceStore>,
    permissions: Arc<dyn PermissionStore>,
    executor: Arc<dyn PolicyScriptExecutor>,
    grant_access_if_no_policies: bool,
}

impl ScopePolicyEvaluator {
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        permissions: Arc<dyn PermissionStore>,
        executor: Arc<dyn PolicyScriptExecutor>,
    ) -> Self {
        Self {
            resources,
            permissions,
            executor,
            grant_access_if_no_policies: false,
        }
    }

    /// Grant access when no script is bound to any evaluated scope
    pub fn with_grant_access_if_no_policies(mut self, grant: bool) -> Self {
        self.grant_access_if_no_policies = grant;
        self
    }

    /// Evaluate `bindings` for every permission, narrowing them in place
    ///
    /// # Arguments
    /// * `bindings` - Scripts with their per-scope contexts
    /// * `permissions` - Permissions attached to the RPT
    ///
    /// # Errors
    /// `ForbiddenByPolicy` on the first permission that is refused, or when
    /// no scripts are bound and access without policies is disabled.
    #[tracing::instrument(skip_all, fields(bindings = bindings.len(), permissions = permissions.len()))]
    pub async fn evaluate(
        &self,
        bindings: &[ScriptBinding],
        permissions: &mut [Permission],
    ) -> Result<()> {
        if bindings.is_empty() {
            if self.grant_access_if_no_policies {
                debug!("No policies bound, access granted by configuration");
                return Ok(());
            }
            return Err(UmaError::forbidden(
                "no policies are bound to the requested scopes",
            ));
        }

        for permission in permissions.iter_mut() {
            self.evaluate_permission(bindings, permission).await?;
        }

        Ok(())
    }

    /// Evaluate `bindings` for a single permission
    ///
    /// # Returns
    /// The scopes removed by narrowing (always empty without a scope
    /// expression)
    pub async fn evaluate_permission(
        &self,
        bindings: &[ScriptBinding],
        permission: &mut Permission,
    ) -> Result<Granted> {
        let resource = self
            .resources
            .get_resource_by_id(&permission.resource_id)
            .await?
            .ok_or_else(|| {
                UmaError::ResourceResolution(format!(
                    "resource {} of permission {} not found",
                    permission.resource_id, permission.id
                ))
            })?;

        let relevant = relevant_bindings(bindings, permission);

        match resource.expression() {
            None => {
                if !self.conjunction(relevant.iter().copied()) {
                    return Err(UmaError::forbidden(format!(
                        "policy refused permission {} on resource {}",
                        permission.id, resource.id
                    )));
                }
                debug!("Permission {} granted by all policies", permission.id);
                Ok(Granted::default())
            }
            Some(expression) => {
                self.evaluate_expression(expression, &relevant, permission)
                    .await
            }
        }
    }

    async fn evaluate_expression(
        &self,
        expression: &str,
        relevant: &[&ScriptBinding],
        permission: &mut Permission,
    ) -> Result<Granted> {
        let node = LogicNode::parse(expression).map_err(|e| {
            warn!("Scope expression of resource {} is invalid: {}", permission.resource_id, e);
            UmaError::forbidden(format!("failed to parse scope expression: {}", e))
        })?;

        let scope_id_to_ref: HashMap<&str, &str> = relevant
            .iter()
            .map(|b| (b.scope_id(), b.scope_ref()))
            .collect();

        if node.data.len() != scope_id_to_ref.len() {
            return Err(UmaError::forbidden(format!(
                "scope expression declares {} scopes but {} are bound to permission {}",
                node.data.len(),
                scope_id_to_ref.len(),
                permission.id
            )));
        }

        let mut decisions = Vec::with_capacity(node.data.len());
        let mut failed: HashSet<ScopeRef> = HashSet::new();

        for scope_id in &node.data {
            let scope_ref = scope_id_to_ref.get(scope_id.as_str()).ok_or_else(|| {
                UmaError::forbidden(format!(
                    "scope expression references unbound scope {}",
                    scope_id
                ))
            })?;

            let passed = self.conjunction(
                relevant
                    .iter()
                    .copied()
                    .filter(|b| b.scope_id() == scope_id.as_str()),
            );
            if !passed {
                failed.insert(scope_ref.to_string());
            }
            decisions.push(passed);
        }

        if !logic::apply(&node.rule, &decisions)? {
            return Err(UmaError::forbidden(format!(
                "scope expression evaluated to false for permission {} ({:?} -> {:?})",
                permission.id, node.data, decisions
            )));
        }

        let removed = permission.narrow(&failed);
        if !removed.is_empty() {
            info!(
                "Narrowed permission {} by removing scopes {:?}",
                permission.id, removed
            );
            if let Err(e) = self.permissions.merge_permission(permission).await {
                warn!("Failed to persist narrowed permission {}: {}", permission.id, e);
            }
        }

        Ok(Granted { removed })
    }

    /// Short-circuiting AND over the given scripts
    fn conjunction<'a>(&self, bindings: impl IntoIterator<Item = &'a ScriptBinding>) -> bool {
        bindings.into_iter().all(|binding| {
            let script = &binding.scoped.script;
            let allowed = self.executor.authorize(script, &binding.context);
            debug!(
                "Policy {} on scope {} returned {}",
                script.id,
                binding.scope_id(),
                allowed
            );
            allowed
        })
    }
}

/// Bindings whose scope is among the permission's scope references
fn relevant_bindings<'a>(
    bindings: &'a [ScriptBinding],
    permission: &Permission,
) -> Vec<&'a ScriptBinding> {
    let refs: HashSet<&str> = permission.scope_refs.iter().map(String::as_str).collect();
    bindings
        .iter()
        .filter(|b| refs.contains(b.scope_ref()))
        .collect()
}
