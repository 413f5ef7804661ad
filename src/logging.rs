//! Tracing setup for the `policyedit` binary

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::EditorConfig;
use crate::core::{PolicyError, PolicyResult};

const LOG_FILE_PREFIX: &str = "policyedit.log";

fn env_filter(directive: &str) -> PolicyResult<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| PolicyError::InvalidConfig(format!("log level {:?}: {}", directive, e)))
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `config.log_level`. Logs go to stderr, plus a daily
/// rolling JSON file when `config.log_dir` is set. Keep the returned guard alive
/// until exit or buffered file output is lost.
pub fn init_logging(config: &EditorConfig) -> PolicyResult<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => env_filter(&config.log_level)?,
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PolicyError::InvalidConfig(format!("logging already initialized: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("policyedit=debug,warn").is_ok());
        assert!(matches!(
            env_filter("policyedit=loudest"),
            Err(PolicyError::InvalidConfig(_))
        ));
    }
}
