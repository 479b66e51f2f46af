//! `interface-notifier`: compares interface addresses with the last run and
//! notifies Slack/Email receivers about watched interfaces that changed.

use std::path::Path;
use std::process::ExitCode;

use interface_notifier::config::{Cli, Command, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{Status, config_hint, init_logging};

#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let status = match &cli.command {
        Some(Command::Init { output }) => init(output),
        None => match ValidatedConfig::load(&cli) {
            Ok(config) => detect_once(config),
            Err(e) => {
                eprintln!("Configuration error: {e}");
                if let Some(hint) = config_hint(&e) {
                    eprintln!("\n{hint}");
                }
                Status::BadConfig
            }
        },
    };

    status.into()
}

/// Writes the commented starter config to `output`.
fn init(output: &Path) -> Status {
    if let Err(e) = write_default_config(output) {
        eprintln!("Error: {e}");
        return Status::BadConfig;
    }
    println!("Wrote starter config to {}", output.display());
    Status::Ok
}

/// Performs one fetch-detect-notify-save cycle.
///
/// A current-thread runtime is enough: notifications go out one at a time.
#[cfg(not(tarpaulin_include))]
fn detect_once(config: ValidatedConfig) -> Status {
    init_logging(config.verbose);
    tracing::info!("{config}");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {e}");
            return Status::RunFailed;
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(summary) => {
            tracing::info!(
                "Done: {} change(s), {} delivered, {} failed",
                summary.events,
                summary.deliveries.delivered,
                summary.deliveries.failed
            );
            Status::Ok
        }
        Err(e) => {
            tracing::error!("Run aborted: {e}");
            Status::RunFailed
        }
    }
}
