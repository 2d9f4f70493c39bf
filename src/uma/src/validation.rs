//! Ticket, permission and resource validation
//!
//! Checks applied at the protocol boundary before a ticket is exchanged or a
//! resource is registered.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{Result, UmaError};
use crate::logic::LogicNode;
use crate::permission::Permission;
use crate::resource::Resource;
use crate::store::PermissionStore;

/// Validates tickets, permissions and resource registrations
#[derive(Clone)]
pub struct UmaValidator {
    permissions: Arc<dyn PermissionStore>,
}

impl UmaValidator {
    pub fn new(permissions: Arc<dyn PermissionStore>) -> Self {
        Self { permissions }
    }

    /// Resolve the permissions registered under `ticket`
    ///
    /// # Errors
    /// `InvalidTicket` if the ticket is blank or unknown
    #[tracing::instrument(skip_all, fields(ticket = %ticket))]
    pub async fn validate_ticket(&self, ticket: &str) -> Result<Vec<Permission>> {
        if ticket.trim().is_empty() {
            error!("Ticket is blank");
            return Err(UmaError::InvalidTicket("ticket is blank".to_string()));
        }

        let permissions = self.permissions.get_permissions_by_ticket(ticket).await?;
        if permissions.is_empty() {
            error!("No permissions registered for ticket {}", ticket);
            return Err(UmaError::InvalidTicket(format!(
                "no permissions registered for ticket {}",
                ticket
            )));
        }

        debug!("Ticket {} resolves to {} permissions", ticket, permissions.len());
        Ok(permissions)
    }

    /// Check that `permission` can still be exchanged
    ///
    /// # Errors
    /// `InvalidTicket` if invalidated, `ExpiredTicket` if expired at `now`
    pub fn validate_permission(&self, permission: &Permission, now: DateTime<Utc>) -> Result<()> {
        if permission.is_invalidated() {
            return Err(UmaError::InvalidTicket(format!(
                "permission {} is invalidated",
                permission.id
            )));
        }
        if permission.is_expired(now) {
            return Err(UmaError::ExpiredTicket(format!(
                "permission {} expired at {}",
                permission.id, permission.expires_at
            )));
        }
        Ok(())
    }

    /// Validate every permission, stopping at the first failure
    pub fn validate_permissions(&self, permissions: &[Permission], now: DateTime<Utc>) -> Result<()> {
        permissions
            .iter()
            .try_for_each(|p| self.validate_permission(p, now))
    }

    /// Reject a non-blank scope expression that is not valid JsonLogic
    pub fn validate_scope_expression(&self, expression: Option<&str>) -> Result<()> {
        match expression {
            Some(expr) if !expr.trim().is_empty() && !LogicNode::is_valid(expr) => {
                error!("Scope expression is invalid: {}", expr);
                Err(UmaError::InvalidScope(format!(
                    "scope expression is invalid: {}",
                    expr
                )))
            }
            _ => Ok(()),
        }
    }

    /// Validate a resource registration
    ///
    /// # Errors
    /// `InvalidScope` if the scope expression is invalid, or if both the
    /// scope list and the scope expression are blank
    pub fn validate_resource(&self, resource: &Resource) -> Result<()> {
        self.validate_scope_expression(resource.scope_expression.as_deref())?;

        if resource.scopes.is_empty() && resource.expression().is_none() {
            return Err(UmaError::InvalidScope(format!(
                "resource {} has neither scopes nor a scope expression",
                resource.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionStatus;
    use crate::store::InMemoryStore;
    use chrono::Duration;

    fn validator() -> UmaValidator {
        UmaValidator::new(Arc::new(InMemoryStore::new()))
    }

    fn permission(expires_in: i64) -> Permission {
        Permission::new(
            "r1",
            vec!["inum=read,ou=scopes".to_string()],
            Utc::now() + Duration::seconds(expires_in),
        )
    }

    #[tokio::test]
    async fn test_blank_and_unknown_tickets() {
        let validator = validator();
        assert!(matches!(
            validator.validate_ticket("  ").await,
            Err(UmaError::InvalidTicket(_))
        ));
        assert!(matches!(
            validator.validate_ticket("nope").await,
            Err(UmaError::InvalidTicket(_))
        ));
    }

    #[test]
    fn test_validate_permission() {
        let validator = validator();
        let now = Utc::now();

        assert!(validator.validate_permission(&permission(60), now).is_ok());
        assert!(matches!(
            validator.validate_permission(&permission(-1), now),
            Err(UmaError::ExpiredTicket(_))
        ));

        let mut invalidated = permission(60);
        invalidated.status = PermissionStatus::Invalidated;
        assert!(matches!(
            validator.validate_permission(&invalidated, now),
            Err(UmaError::InvalidTicket(_))
        ));
    }

    #[test]
    fn test_validate_scope_expression() {
        let validator = validator();
        assert!(validator.validate_scope_expression(None).is_ok());
        assert!(validator.validate_scope_expression(Some(" ")).is_ok());
        assert!(validator
            .validate_scope_expression(Some(r#"{"rule": {"and": [{"var": 0}]}, "data": ["read"]}"#))
            .is_ok());
        assert!(matches!(
            validator.validate_scope_expression(Some("{broken")),
            Err(UmaError::InvalidScope(_))
        ));
    }

    #[test]
    fn test_validate_resource() {
        let validator = validator();
        assert!(validator
            .validate_resource(&Resource::new("r1", "docs").with_scopes(["read"]))
            .is_ok());
        assert!(validator
            .validate_resource(&Resource::new("r2", "docs").with_scope_expression(
                r#"{"rule": {"or": [{"var": 0}, {"var": 1}]}, "data": ["a", "b"]}"#
            ))
            .is_ok());
        assert!(matches!(
            validator.validate_resource(&Resource::new("r3", "docs")),
            Err(UmaError::InvalidScope(_))
        ));
    }
}
