//! Subscriber installation for the `tracing` events emitted by the analyses.
//!
//! Library code only emits events. An embedding binary calls
//! [`init_logging`] once:
//!
//! ```ignore
//! use qk_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter for `config`. Directives that fail to parse fall back to the level.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(format!("qk_core={}", config.level.as_str())))
}

/// Install the global stderr subscriber.
///
/// Returns false when a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    match (config.format, config.timestamps) {
        (LogFormat::Jsonl, _) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init()
            .is_ok(),
        (LogFormat::Human, with_time) => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if with_time {
                registry.with(layer).try_init().is_ok()
            } else {
                registry.with(layer.without_time()).try_init().is_ok()
            }
        }
    }
}
