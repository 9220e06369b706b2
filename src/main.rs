//! Blaster server binary.

use blaster::config::BlasterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "blaster.toml".into());
    let config = BlasterConfig::load(&config_path)?;

    tracing::info!("blaster starting");
    blaster::server::run(config).await?;
    Ok(())
}
