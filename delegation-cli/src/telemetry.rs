use std::sync::{Once, OnceLock};

use env_logger::Env;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Stderr shows client decisions (tree selection, proof path) by default.
pub const STDERR_DIRECTIVES: &str = "info,counter_delegation_client=debug";
pub const FILE_DIRECTIVES: &str = "info";

static INIT: Once = Once::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Filter of a single layer. `RUST_LOG` replaces the layer default when it
/// parses.
fn layer_filter(env_directives: Option<&str>, default: &str) -> EnvFilter {
    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

pub fn setup_telemetry() {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();

        // stdout is reserved for command output.
        let stderr_layer = fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_filter(layer_filter(rust_log.as_deref(), STDERR_DIRECTIVES));

        let file_layer = match RollingFileAppender::builder()
            .rotation(Rotation::HOURLY)
            .filename_prefix("delegation")
            .filename_suffix("log")
            .max_log_files(24)
            .build("logs")
        {
            Ok(appender) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                Some(
                    fmt::Layer::new()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_filter(layer_filter(rust_log.as_deref(), FILE_DIRECTIVES)),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to create log file appender: {}. Logging to stderr only.",
                    e
                );
                None
            }
        };

        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .init();
    });
}

/// Plain logging without a log file. Library events reach it through the
/// `log` feature of `tracing`.
pub fn setup_logger() {
    let env = Env::new().filter_or("RUST_LOG", STDERR_DIRECTIVES);
    env_logger::Builder::from_env(env).init();
}
