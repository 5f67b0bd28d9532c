//! Error types for the snake daemon.
//!
//! Three classes of failure, handled differently by the daemon:
//!
//! - [`UsageError`]: bad command line. Nothing has touched the hardware yet;
//!   the usage banner is printed and the process exits with status 1.
//! - [`SnakeError`]: a step the whole run depends on failed (driver bring-up,
//!   group creation, and base setup in strict mode). Exit status 1.
//! - [`RuleFailure`]: one patch rule could not be installed. Logged, counted
//!   in the [`crate::InstallReport`], and the remaining rules still go in.

use std::fmt;

use opennsl_sdk::NslError;
use opennsl_types::PortId;
use thiserror::Error;

/// Result type alias for daemon operations.
pub type SnakeResult<T> = Result<T, SnakeError>;

/// Which port of an `A:B` pair a range error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    A,
    B,
}

impl fmt::Display for PairSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairSide::A => f.write_str("first"),
            PairSide::B => f.write_str("second"),
        }
    }
}

/// Command-line errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// A pair token has the wrong shape.
    #[error("{reason} -- {token}")]
    Parse { token: String, reason: &'static str },

    /// A port in a pair token is outside `1..max_ports`.
    #[error("Port out of range {value} ({side} port of {token}, must be 1-{max})", max = .max_ports - 1)]
    Range {
        token: String,
        side: PairSide,
        value: i64,
        max_ports: u16,
    },

    /// An option value was rejected.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// `-h` / `--help`.
    #[error("help requested")]
    HelpRequested,
}

impl UsageError {
    pub(crate) fn unknown_parameter(token: &str) -> Self {
        UsageError::Parse {
            token: token.to_string(),
            reason: "Unknown parameter",
        }
    }

    pub(crate) fn malformed_pair(token: &str) -> Self {
        UsageError::Parse {
            token: token.to_string(),
            reason: "Unknown port patch parameter (should be \"1:2\")",
        }
    }
}

/// Errors that stop the daemon.
#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("Failed to initialize OpenNSL: {} : {source}", .source.raw_code())]
    DriverInit {
        #[source]
        source: NslError,
    },

    #[error("Failed to add ports to the default VLAN: {source}")]
    BaseSetup {
        #[source]
        source: NslError,
    },

    #[error("Failed to create the L1 matching group: {source}")]
    GroupCreate {
        #[source]
        source: NslError,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl SnakeError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// The SDK error behind this failure, if any.
    pub fn sdk_error(&self) -> Option<&NslError> {
        match self {
            SnakeError::DriverInit { source }
            | SnakeError::BaseSetup { source }
            | SnakeError::GroupCreate { source } => Some(source),
            SnakeError::Logging(_) => None,
        }
    }
}

/// The four SDK steps that make up one patch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleStep {
    CreateEntry,
    QualifyInPort,
    AddRedirect,
    Install,
}

impl fmt::Display for RuleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleStep::CreateEntry => "Entry Create",
            RuleStep::QualifyInPort => "Qualify InPort",
            RuleStep::AddRedirect => "Field Action Add",
            RuleStep::Install => "Entry Install",
        };
        f.write_str(s)
    }
}

/// A patch rule that could not be installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("patch {src} -> {dst}: {step} failed: {error}")]
pub struct RuleFailure {
    pub src: PortId,
    pub dst: PortId,
    pub step: RuleStep,
    #[source]
    pub error: NslError,
}
