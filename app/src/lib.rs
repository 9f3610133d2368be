pub mod app;
pub mod config;
pub mod feed;
pub mod render;
pub mod shutdown;

use tracing_subscriber::EnvFilter;

use config::AppConfig;

/// Log to stderr so stdout carries only render frames.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and build the runtime configuration.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load()?;
    tracing::info!(
        max_visible = config.toast.max_visible,
        default_duration_ms = config.toast.default_duration.as_millis() as u64,
        "Settings loaded"
    );
    Ok(config)
}
