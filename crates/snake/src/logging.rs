//! Log output setup for the binary.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use crate::error::{SnakeError, SnakeResult};

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `log_level` when set. Records emitted through the
/// `log` crate (the SDK crate) are forwarded to the same subscriber. Colors
/// are only used when stderr is a terminal.
pub fn init_logging(log_level: &str) -> SnakeResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| SnakeError::Logging(format!("bad log level {log_level:?}: {e}")))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(std::io::stderr, std::io::stderr().is_terminal()))
        .try_init()
        .map_err(|e| SnakeError::Logging(e.to_string()))
}

fn output_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(ansi: bool) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber =
            tracing_subscriber::registry().with(output_layer(move || writer.clone(), ansi));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Patching 1 <---> 2");
        });
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let out = capture(false);
        assert!(out.contains("Patching 1 <---> 2"), "{out}");
        assert!(out.contains("opennsl_snake::logging"), "{out}");
        assert!(!out.contains('\u{1b}'), "{out:?}");
    }

    #[test]
    fn test_terminal_output_is_colored() {
        assert!(capture(true).contains('\u{1b}'));
    }

    #[test]
    fn test_bad_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = init_logging("opennsl_snake=loud").unwrap_err();
        assert!(matches!(err, SnakeError::Logging(_)));
    }
}
