mod app_config;
pub mod loader;
pub mod paths;

pub use app_config::*;
pub use loader::ConfigSource;

use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Install the settings read at startup. The first call wins.
pub fn init(config: AppConfig) -> &'static AppConfig {
    let installed = APP_CONFIG.get_or_init(|| config);
    tracing::info!("Configuration initialized");
    installed
}

/// Get application configuration, loading it on first use
pub fn app() -> &'static AppConfig {
    APP_CONFIG.get_or_init(loader::load_config)
}
