//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the toolkit.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API toolkit service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Third-party provider endpoints.
    pub providers: ProviderConfig,

    /// Audit database settings.
    pub database: DatabaseConfig,

    /// Audit record settings.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Outbound provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the exchange-rate API; `/latest/{source}` is appended.
    pub exchange_rate_url: String,

    /// Base URL of the geolocation API; `/{ip}` is appended.
    pub geolocation_url: String,

    /// Field-selection mask sent as the `fields` query parameter.
    pub geolocation_fields: u64,

    /// User-Agent header for outbound requests.
    pub user_agent: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            exchange_rate_url: "https://api.exchangerate-api.com/v4".to_string(),
            geolocation_url: "http://ip-api.com/json".to_string(),
            geolocation_fields: 66_846_719,
            user_agent: concat!("api-toolkit/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
        }
    }
}

/// Audit database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite:toolkit.db").
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:toolkit.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Audit record configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Identity stamped on every audit row. There is no authentication, so
    /// this is a fixed placeholder.
    pub user_id: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            user_id: "placeholder_user_id".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
