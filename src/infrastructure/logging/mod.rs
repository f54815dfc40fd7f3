//! Logging infrastructure with file output support for production.

use crate::infrastructure::config::paths;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging with console and optional file output.
///
/// `RUST_LOG` overrides the console level. In production, logs are also
/// written daily to `<config_dir>/logs/runwithme.log`.
///
/// Calling this more than once keeps the first subscriber.
pub fn setup(is_production: bool) {
    let default_level = if is_production { "info" } else { "debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer().with_target(true).with_filter(filter);

    let file_layer = if is_production {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "runwithme.log");

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .with_filter(EnvFilter::new("info")),
            )
        }
    } else {
        None
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    if is_production {
        tracing::info!("File logging enabled: {:?}", paths::log_dir());
    }
    tracing::info!("Logging initialized (production={})", is_production);
}
