//! Tracing subscriber setup for the playground binary.

use roast_core::ConfigError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
#[error("Failed to init subscriber: {0}")]
pub struct TelemetryError(String);

const DEFAULT_FILTER: &str = "roast_engine=debug,roast_llm=info,info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    pub service_version: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "roast-playground".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            format: LogFormat::Json,
        }
    }
}

impl TelemetryConfig {
    /// Reads `ROAST_SERVICE_NAME` and `ROAST_LOG_FORMAT` (`json` or `pretty`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let format = match std::env::var("ROAST_LOG_FORMAT") {
            Ok(value) => parse_format(&value)?,
            Err(_) => defaults.format,
        };

        Ok(Self {
            service_name: std::env::var("ROAST_SERVICE_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.service_name),
            service_version: defaults.service_version,
            format,
        })
    }
}

fn parse_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" | "text" => Ok(LogFormat::Pretty),
        other => Err(ConfigError::InvalidValue {
            field: "ROAST_LOG_FORMAT".to_string(),
            value: other.to_string(),
            reason: "expected json or pretty".to_string(),
        }),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Call once at startup; a second call fails because a subscriber is
/// already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };
    result.map_err(|e| TelemetryError(e.to_string()))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        format = ?config.format,
        "Telemetry initialized"
    );
    Ok(())
}
