//! Binary entrypoint for the Photocast API server.
use anyhow::Context;
use photocast_api::{build_state, run, AppConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photocast=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };

    tokio::fs::create_dir_all(&config.temp_dir)
        .await
        .with_context(|| format!("creating temp dir {}", config.temp_dir.display()))?;
    tracing::info!(temp_dir = %config.temp_dir.display(), "temp directory ready");

    run(build_state(config)?).await
}
