//! Log output for the `lexis` binary.
//!
//! Library code only emits `tracing` events; this installs the subscriber
//! that writes them to stderr, leaving stdout to command output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if let Err(e) = Registry::default().with(env_filter).with(stderr_layer).try_init() {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
