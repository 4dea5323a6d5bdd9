use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use radar_common::Config;
use radar_worker::bootstrap::bootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("radar_worker=info".parse()?),
        )
        .init();

    info!("Venue radar worker starting...");

    let config = Config::from_env();
    let runtime = bootstrap(&config).await?;

    info!(
        seeds = runtime.scheduler.seed_count(),
        cycle_minutes = config.cycle_minutes,
        "Entering scan loop"
    );
    runtime.scheduler.run_forever().await;
    Ok(())
}
