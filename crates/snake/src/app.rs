//! The process flow of the `opennsl-snake` binary, minus signal handling.
//!
//! Both entry points return the exit status the process should end with:
//! 0 after `--version` or a clean shutdown, 1 for usage errors and fatal
//! SDK failures.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;
use opennsl_sdk::{OpenNslDriver, SimulatedSwitch, SwitchSdk};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{print_usage, Cli, SnakeConfig};
use crate::daemon::SnakeDaemon;
use crate::error::UsageError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Parses the command line. On `Err` the caller exits with that status;
/// anything worth saying has already been written to stderr.
pub fn parse_args<I, T>(args: I) -> Result<SnakeConfig, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            let _ = e.print();
            return Err(EXIT_SUCCESS);
        }
        Err(e) => return Err(usage_failure(&UsageError::InvalidOption(e.to_string()))),
    };

    match SnakeConfig::try_from(cli) {
        Ok(config) => Ok(config),
        Err(UsageError::HelpRequested) => {
            print_usage(None);
            Err(EXIT_FAILURE)
        }
        Err(e) => Err(usage_failure(&e)),
    }
}

/// Programs the switch described by `config` and idles until `shutdown`.
pub async fn serve(config: SnakeConfig, shutdown: CancellationToken) -> u8 {
    let map = match config.port_map() {
        Ok(map) => map,
        Err(e) => return usage_failure(&e),
    };

    let sdk: Box<dyn SwitchSdk> = if config.simulate {
        info!("Using simulated switch with {} ports", config.max_ports - 1);
        Box::new(SimulatedSwitch::with_ports(config.max_ports - 1))
    } else {
        Box::new(OpenNslDriver::new())
    };

    let mut daemon = SnakeDaemon::new(config, sdk);
    match daemon.run(&map, shutdown).await {
        Ok(report) => {
            if !report.is_complete() {
                warn!(
                    "{} of {} patch rules failed to install",
                    report.failed.len(),
                    report.attempted()
                );
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

fn usage_failure(reason: &UsageError) -> u8 {
    print_usage(Some(reason));
    EXIT_FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(rest: &[&str]) -> Vec<String> {
        std::iter::once("opennsl-snake")
            .chain(rest.iter().copied())
            .map(String::from)
            .collect()
    }

    fn cancelled() -> CancellationToken {
        let token = CancellationToken::new();
        token.cancel();
        token
    }

    #[test]
    fn test_help_exits_with_failure() {
        assert_eq!(parse_args(args(&["-h"])), Err(EXIT_FAILURE));
        assert_eq!(parse_args(args(&["1:2", "--help"])), Err(EXIT_FAILURE));
    }

    #[test]
    fn test_version_exits_with_success() {
        assert_eq!(parse_args(args(&["--version"])), Err(EXIT_SUCCESS));
    }

    #[test]
    fn test_bad_option_exits_with_failure() {
        assert_eq!(parse_args(args(&["--bogus"])), Err(EXIT_FAILURE));
        assert_eq!(parse_args(args(&["--max-ports", "7"])), Err(EXIT_FAILURE));
    }

    #[tokio::test]
    async fn test_bad_pair_exits_with_failure() {
        let config = parse_args(args(&["--simulate", "abc:5"])).unwrap();
        assert_eq!(serve(config, cancelled()).await, EXIT_FAILURE);

        let config = parse_args(args(&["--simulate", "--max-ports", "8", "7:8"])).unwrap();
        assert_eq!(serve(config, cancelled()).await, EXIT_FAILURE);
    }

    #[tokio::test]
    async fn test_shutdown_exits_with_success() {
        let config = parse_args(args(&["--simulate", "--max-ports", "8", "1:2", "3:4"])).unwrap();
        assert_eq!(serve(config, cancelled()).await, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_shutdown_while_idle_exits_with_success() {
        let config = parse_args(args(&["--simulate", "--max-ports", "8"])).unwrap();
        let token = CancellationToken::new();
        let interrupt = async {
            tokio::task::yield_now().await;
            token.cancel();
        };

        let (status, ()) = tokio::join!(serve(config, token.clone()), interrupt);
        assert_eq!(status, EXIT_SUCCESS);
    }

    #[cfg(not(feature = "opennsl-link"))]
    #[tokio::test]
    async fn test_unlinked_driver_exits_with_failure() {
        let config = parse_args(args(&["--max-ports", "8"])).unwrap();
        assert_eq!(serve(config, cancelled()).await, EXIT_FAILURE);
    }
}
