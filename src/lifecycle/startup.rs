//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Open the audit database before any handler can run
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound by the caller, after state is ready

use thiserror::Error;

use crate::audit::{AuditError, AuditLog};
use crate::config::{ConfigError, ToolkitConfig};
use crate::http::AppState;
use crate::observability::metrics;
use crate::providers::ProviderError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("audit log: {0}")]
    Audit(#[from] AuditError),

    #[error("providers: {0}")]
    Provider(#[from] ProviderError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring up metrics, the audit log and provider clients.
pub async fn init_state(config: ToolkitConfig) -> Result<AppState, StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let audit = AuditLog::connect(&config.database).await?;
    let state = AppState::new(config, audit)?;

    tracing::info!(
        exchange_rate_url = %state.config.providers.exchange_rate_url,
        geolocation_url = %state.config.providers.geolocation_url,
        "Provider clients ready"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> ToolkitConfig {
        let mut config = ToolkitConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config
    }

    #[tokio::test]
    async fn test_init_state() {
        let state = init_state(memory_config()).await.unwrap();
        assert_eq!(state.audit.count().await.unwrap(), 0);
        assert_eq!(state.config.audit.user_id, "placeholder_user_id");
    }

    #[tokio::test]
    async fn test_invalid_provider_url_is_fatal() {
        let mut config = memory_config();
        config.providers.geolocation_url = "not a url".to_string();
        let err = init_state(config).await.err().unwrap();
        assert!(matches!(err, StartupError::Provider(ProviderError::InvalidUrl(_))));
    }
}
