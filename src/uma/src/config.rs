//! Engine configuration

use chrono::Duration;
use serde::Deserialize;

/// Ticket lifetime used when the configured value is not positive
pub const DEFAULT_TICKET_LIFETIME_SECS: i64 = 3600;

const DEFAULT_ISSUER: &str = "https://localhost";
const UMA_CONFIGURATION_PATH: &str = "/.well-known/uma2-configuration";

/// UMA engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UmaConfig {
    /// Permission ticket lifetime in seconds (non-positive means default)
    pub ticket_lifetime_seconds: i64,

    /// Issuer, sent as `host_id` on ticket responses
    pub issuer: String,

    /// UMA configuration endpoint, sent as `as_uri` on ticket responses
    pub uma_configuration_endpoint: String,

    /// Grant access when no policy script is bound to the requested scopes
    pub grant_access_if_no_policies: bool,
}

impl Default for UmaConfig {
    fn default() -> Self {
        Self::with_issuer(DEFAULT_ISSUER)
    }
}

impl UmaConfig {
    /// Defaults for the given issuer
    pub fn with_issuer(issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let uma_configuration_endpoint = configuration_endpoint_for(&issuer);
        Self {
            ticket_lifetime_seconds: DEFAULT_TICKET_LIFETIME_SECS,
            issuer,
            uma_configuration_endpoint,
            grant_access_if_no_policies: false,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `UMA_ISSUER` - issuer (default: https://localhost)
    /// - `UMA_CONFIGURATION_ENDPOINT` - default: `<issuer>/.well-known/uma2-configuration`
    /// - `UMA_TICKET_LIFETIME` - seconds (default: 3600)
    /// - `UMA_GRANT_ACCESS_IF_NO_POLICIES` - default: false
    pub fn from_env() -> Self {
        let issuer = std::env::var("UMA_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());
        let mut config = Self::with_issuer(issuer);

        if let Ok(endpoint) = std::env::var("UMA_CONFIGURATION_ENDPOINT") {
            config.uma_configuration_endpoint = endpoint;
        }

        config.ticket_lifetime_seconds = std::env::var("UMA_TICKET_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TICKET_LIFETIME_SECS);

        config.grant_access_if_no_policies = std::env::var("UMA_GRANT_ACCESS_IF_NO_POLICIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false);

        config
    }

    pub fn with_ticket_lifetime(mut self, seconds: i64) -> Self {
        self.ticket_lifetime_seconds = seconds;
        self
    }

    pub fn with_grant_access_if_no_policies(mut self, grant: bool) -> Self {
        self.grant_access_if_no_policies = grant;
        self
    }

    /// Effective ticket lifetime, never zero or negative
    pub fn ticket_lifetime(&self) -> Duration {
        if self.ticket_lifetime_seconds > 0 {
            Duration::seconds(self.ticket_lifetime_seconds)
        } else {
            Duration::seconds(DEFAULT_TICKET_LIFETIME_SECS)
        }
    }
}

fn configuration_endpoint_for(issuer: &str) -> String {
    format!("{}{}", issuer.trim_end_matches('/'), UMA_CONFIGURATION_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UmaConfig::default();
        assert_eq!(config.ticket_lifetime_seconds, 3600);
        assert_eq!(
            config.uma_configuration_endpoint,
            "https://localhost/.well-known/uma2-configuration"
        );
        assert!(!config.grant_access_if_no_policies);
    }

    #[test]
    fn test_non_positive_lifetime_falls_back() {
        for value in [0, -1, -3600] {
            let config = UmaConfig::default().with_ticket_lifetime(value);
            assert_eq!(config.ticket_lifetime(), Duration::seconds(3600));
        }

        let config = UmaConfig::default().with_ticket_lifetime(120);
        assert_eq!(config.ticket_lifetime(), Duration::seconds(120));
    }

    #[test]
    fn test_issuer_trailing_slash() {
        let config = UmaConfig::with_issuer("https://as.example.com/");
        assert_eq!(
            config.uma_configuration_endpoint,
            "https://as.example.com/.well-known/uma2-configuration"
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: UmaConfig =
            serde_json::from_str(r#"{"ticket_lifetime_seconds": 60}"#).unwrap();
        assert_eq!(config.ticket_lifetime_seconds, 60);
        assert_eq!(config.issuer, "https://localhost");
    }
}
