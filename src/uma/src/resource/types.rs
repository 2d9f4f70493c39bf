//! Resource records and internal resource types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::UmaError;
use crate::types::{ResourceId, ScopeId};

/// Internal, server-owned resource types
///
/// Each type owns a fixed default scope set. At most one persisted
/// resource exists per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    /// Configuration API
    ConfigApi,
    /// SCIM provisioning API
    Scim,
    /// Passport (inbound identity) API
    Passport,
    /// Casa (self-service credential management)
    Casa,
}

impl ResourceType {
    /// Every internal resource type
    pub const ALL: [ResourceType; 4] = [
        ResourceType::ConfigApi,
        ResourceType::Scim,
        ResourceType::Passport,
        ResourceType::Casa,
    ];

    /// Stable string id used as the persisted type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigApi => "config-api",
            Self::Scim => "scim",
            Self::Passport => "passport",
            Self::Casa => "casa",
        }
    }

    /// Display name given to freshly created resources
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ConfigApi => "Config API Resource",
            Self::Scim => "SCIM Resource",
            Self::Passport => "Passport Resource",
            Self::Casa => "Casa Resource",
        }
    }

    /// Scope ids seeded into a new resource of this type
    pub fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            Self::ConfigApi => &["config-api.read", "config-api.write"],
            Self::Scim => &["scim.users.read", "scim.users.write"],
            Self::Passport => &["passport.config.read"],
            Self::Casa => &["casa.credentials.read", "casa.credentials.write"],
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UmaError::ResourceResolution(format!("Unknown resource type: {}", s)))
    }
}

/// Resource registered by a resource server (or by the server itself)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier
    pub id: ResourceId,

    /// Display name
    pub name: String,

    /// Logical type name for internal resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Scope ids the resource offers
    #[serde(default)]
    pub scopes: Vec<ScopeId>,

    /// JsonLogic node combining per-scope decisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_expression: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(id: impl Into<ResourceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type: None,
            scopes: Vec::new(),
            scope_expression: None,
            created_at: Utc::now(),
        }
    }

    /// New internal resource for `resource_type` with a time-ordered id
    pub fn internal(resource_type: ResourceType) -> Self {
        let mut resource = Self::new(Uuid::now_v7().to_string(), resource_type.display_name());
        resource.resource_type = Some(resource_type.as_str().to_string());
        resource.scopes = resource_type
            .default_scopes()
            .iter()
            .map(|s| s.to_string())
            .collect();
        resource
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScopeId>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scope_expression(mut self, expression: impl Into<String>) -> Self {
        self.scope_expression = Some(expression.into());
        self
    }

    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Scope expression, ignoring blank values
    pub fn expression(&self) -> Option<&str> {
        self.scope_expression
            .as_deref()
            .filter(|e| !e.trim().is_empty())
    }
}
