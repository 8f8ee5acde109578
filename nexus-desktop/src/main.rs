use anyhow::{Context, Result};
use nexus_desktop::{app, logging, terminal};
use nexus_infrastructure::{ConfigService, NexusPaths};

#[tokio::main]
async fn main() -> Result<()> {
    let paths = NexusPaths::default();
    let config_service = ConfigService::new(&paths);
    let config = config_service.get_config();

    let logs_dir = paths.logs_dir().context("Failed to resolve the logs directory")?;
    let _guard = logging::init(&logs_dir, &config.logging.level)?;

    // Reload so warnings from the first load land in the log file.
    config_service.invalidate_cache();
    let config = config_service.get_config();
    tracing::info!("[Main] Starting Nexus Desktop");

    let bootstrap = app::bootstrap(config, &paths).await?;
    let result = terminal::run(bootstrap.app_state.clone(), bootstrap.closed.clone()).await;
    if let Err(e) = &result {
        tracing::error!("[Main] Terminal front end failed: {:#}", e);
    }

    let store = bootstrap.shutdown().await;
    tracing::info!(
        "[Main] Exiting with {} history entries",
        store.state().history.len()
    );
    result
}
