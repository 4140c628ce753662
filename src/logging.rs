//! Logging init: `tracing` subscriber with env filter, pretty or JSON output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(config: &Config) -> &'static str {
    if config.is_production() {
        "phishing_service=info,tower_http=info"
    } else {
        "phishing_service=debug,tower_http=debug"
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config).into());

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_environment() {
        let dev = Config::from_lookup(|_| None);
        assert!(default_filter(&dev).contains("=debug"));

        let prod = Config::from_lookup(|k| (k == "ENVIRONMENT").then(|| "production".to_string()));
        assert_eq!(default_filter(&prod), "phishing_service=info,tower_http=info");
    }
}
