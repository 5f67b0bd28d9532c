//! opennsl-snake entry point.

use std::process::ExitCode;

use opennsl_snake::app;
use opennsl_snake::init_logging;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match app::parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(status) => return ExitCode::from(status),
    };

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }

    let shutdown = CancellationToken::new();
    let signals = tokio::spawn(wait_for_signal(shutdown.clone()));

    let status = app::serve(config, shutdown).await;
    signals.abort();
    ExitCode::from(status)
}

/// Cancels `shutdown` on SIGINT or SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                return wait_for_ctrl_c(shutdown).await;
            }
        };
        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => warn!("Received SIGINT, shutting down"),
                Err(e) => {
                    error!("Failed to listen for ctrl-c: {}", e);
                    term.recv().await;
                    warn!("Received SIGTERM, shutting down");
                }
            },
            _ = term.recv() => warn!("Received SIGTERM, shutting down"),
        }
        shutdown.cancel();
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c(shutdown).await;
}

async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("Received SIGINT, shutting down");
            shutdown.cancel();
        }
        Err(e) => error!("Failed to listen for ctrl-c: {}", e),
    }
}
