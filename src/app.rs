//! Process-level plumbing for the binary: exit status, log setup and
//! config-error hints.

use std::process::ExitCode;

use interface_notifier::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// How the process ends.
///
/// Delivery failures are reported in the log only; a run in which every
/// receiver failed still ends in [`Status::Ok`] because the snapshot was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Run completed or `init` wrote its template (0).
    Ok,
    /// Config file missing, unreadable or invalid (1).
    BadConfig,
    /// Fetch failure, corrupt or unwritable state, or no runtime (2).
    RunFailed,
}

impl Status {
    const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::BadConfig => 1,
            Self::RunFailed => 2,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        Self::from(status.code())
    }
}

/// Follow-up advice printed under a config error, if any applies.
#[must_use]
pub const fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::FileRead { .. } => {
            Some("Run 'interface-notifier init' to write a starter config.toml.")
        }
        ConfigError::TomlParse(_) => {
            Some("Compare with the layout written by 'interface-notifier init'.")
        }
        _ => None,
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins over `verbose`; without it the level is `info`, or
/// `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn status_codes_are_distinct() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::BadConfig.code(), 1);
        assert_eq!(Status::RunFailed.code(), 2);
    }

    #[test]
    fn missing_config_points_to_init() {
        let error = ConfigError::FileRead {
            path: PathBuf::from("config.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert!(config_hint(&error).is_some_and(|hint| hint.contains("init")));
    }

    #[test]
    fn validation_errors_have_no_hint() {
        let error = ConfigError::InvalidRetry("max_attempts must be greater than 0".to_string());

        assert_eq!(config_hint(&error), None);
    }
}
