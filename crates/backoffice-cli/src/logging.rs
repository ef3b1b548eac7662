use backoffice_core::{ENV_BACKOFFICE_LOG_JSON, ENV_BACKOFFICE_LOG_LEVEL};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::LogFlags;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| match v.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    })
}

/// Flags beat the environment, which beats the config file.
pub(crate) fn log_directive(flags: LogFlags, config: &LoggingConfig) -> String {
    if flags.trace {
        return "trace".to_string();
    }
    if flags.verbose > 0 {
        return "debug".to_string();
    }
    if flags.quiet {
        return "error".to_string();
    }
    std::env::var(ENV_BACKOFFICE_LOG_LEVEL)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| config.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

pub(crate) fn init_tracing(flags: LogFlags, config: &LoggingConfig) {
    let directive = log_directive(flags, config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let log_json = env_bool(ENV_BACKOFFICE_LOG_JSON)
        .or(config.json)
        .unwrap_or(false);
    let result = if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
