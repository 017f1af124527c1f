//! Roast Playground entry point
//!
//! Builds the playground from environment configuration, optionally applies a
//! YAML seed, and prints the resulting stats and leaderboard as JSON.

use roast_core::{ConfigError, PlaygroundConfig};
use roast_engine::seed::{SeedError, SeedFile};
use roast_engine::telemetry::{init_tracing, TelemetryConfig, TelemetryError};
use roast_engine::{Playground, PlaygroundState};
use roast_llm::CapabilityConfig;
use thiserror::Error;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let telemetry_config = TelemetryConfig::from_env()?;
    init_tracing(&telemetry_config)?;

    let config = PlaygroundConfig::from_env();
    config.validate()?;

    let capability = CapabilityConfig::from_env();
    let router = capability.build_router(config.capability_timeout);
    tracing::info!(
        provider = router.primary_name(),
        hosted = capability.is_hosted(),
        timeout_ms = config.capability_timeout.as_millis() as u64,
        "Text capability configured"
    );

    let playground = Playground::new(PlaygroundState::new(config, router));

    if let Ok(path) = std::env::var("ROAST_SEED_FILE") {
        tracing::info!(%path, "Applying seed file");
        SeedFile::load(&path)?.apply(&playground).await?;
    }

    let stats = playground.stats().await;
    let leaderboard = playground.leaderboard(None).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "stats": stats.data,
            "leaderboard": leaderboard.data,
        }))?
    );

    let usage = playground.state().router.usage();
    tracing::info!(
        primary_calls = usage.primary_calls(),
        fallbacks = usage.fallbacks(),
        prompt_tokens = usage.prompt_tokens(),
        completion_tokens = usage.completion_tokens(),
        "Playground run complete"
    );
    Ok(())
}
