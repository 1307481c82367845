use crate::config::{LogFormat, SdkConfig};
use crate::core::constants::DEFAULT_LOG_FILTER;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.log_filter`; a filter that does
/// not parse falls back to `info`. Returns `false` when a subscriber was
/// already installed, so repeated calls are harmless.
pub fn init_logging(config: &SdkConfig) -> bool {
    let filter = env_filter(&config.log_filter);
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    }
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
