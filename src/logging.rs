//! Tracing subscriber setup for the CLI.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output options for [`init_tracing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    /// Emit debug-level events from this crate.
    pub verbose: bool,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl LoggingConfig {
    fn default_directive(self) -> &'static str {
        if self.verbose {
            "info,ttsprep=debug"
        } else {
            "info,ttsprep=info"
        }
    }
}

/// Install the global subscriber, logging to stderr.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(config: LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
