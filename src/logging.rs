use anyhow::Result;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ViewerConfig;

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &ViewerConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "showroom starting");
    Ok(())
}

/// Log configuration
pub fn log_config(config: &ViewerConfig) {
    tracing::info!(
        asset_path = %config.asset_path.display(),
        camera_position = ?config.camera.position,
        fov = config.camera.fov_degrees,
        min_pixels_per_point = config.display.min_pixels_per_point,
        max_pixels_per_point = config.display.max_pixels_per_point,
        "configuration loaded"
    );
}
