//! OpenNSL error types and status handling.
//!
//! Every SDK entry point returns an `opennsl_error_t`. This module turns those
//! raw codes into [`NslStatus`] and wraps failures in [`NslError`], which
//! remembers which SDK call produced them.

use std::fmt;
use thiserror::Error;

/// OpenNSL status codes.
///
/// These values correspond to `opennsl_error_t` in `opennsl/error.h`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NslStatus {
    None = 0,
    Internal = -1,
    Memory = -2,
    Unit = -3,
    Param = -4,
    Empty = -5,
    Full = -6,
    NotFound = -7,
    Exists = -8,
    Timeout = -9,
    Busy = -10,
    Fail = -11,
    Disabled = -12,
    BadId = -13,
    Resource = -14,
    Config = -15,
    Unavail = -16,
    Init = -17,
    Port = -18,
}

/// Text used by `opennsl_errmsg` for codes outside the table.
const UNKNOWN_ERROR: &str = "Unknown error";

impl NslStatus {
    /// Creates a status from a raw `opennsl_error_t`.
    ///
    /// Codes the table does not know are reported as [`NslStatus::Internal`].
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => NslStatus::None,
            -1 => NslStatus::Internal,
            -2 => NslStatus::Memory,
            -3 => NslStatus::Unit,
            -4 => NslStatus::Param,
            -5 => NslStatus::Empty,
            -6 => NslStatus::Full,
            -7 => NslStatus::NotFound,
            -8 => NslStatus::Exists,
            -9 => NslStatus::Timeout,
            -10 => NslStatus::Busy,
            -11 => NslStatus::Fail,
            -12 => NslStatus::Disabled,
            -13 => NslStatus::BadId,
            -14 => NslStatus::Resource,
            -15 => NslStatus::Config,
            -16 => NslStatus::Unavail,
            -17 => NslStatus::Init,
            -18 => NslStatus::Port,
            _ => NslStatus::Internal,
        }
    }

    /// Returns the raw code.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == NslStatus::None
    }

    /// Human-readable message, matching `opennsl_errmsg`.
    pub const fn message(self) -> &'static str {
        match self {
            NslStatus::None => "Ok",
            NslStatus::Internal => "Internal error",
            NslStatus::Memory => "Out of memory",
            NslStatus::Unit => "Invalid unit",
            NslStatus::Param => "Invalid parameter",
            NslStatus::Empty => "Table empty",
            NslStatus::Full => "Table full",
            NslStatus::NotFound => "Entry not found",
            NslStatus::Exists => "Entry exists",
            NslStatus::Timeout => "Operation timed out",
            NslStatus::Busy => "Operation still running",
            NslStatus::Fail => "Operation failed",
            NslStatus::Disabled => "Operation disabled",
            NslStatus::BadId => "Invalid identifier",
            NslStatus::Resource => "No resources for operation",
            NslStatus::Config => "Invalid configuration",
            NslStatus::Unavail => "Feature unavailable",
            NslStatus::Init => "Feature not initialized",
            NslStatus::Port => "Invalid port",
        }
    }

    /// Converts to a Result, tagging failures with the SDK call name.
    pub fn into_result(self, op: &'static str) -> NslResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(NslError::status(op, self))
        }
    }
}

impl fmt::Display for NslStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Describes a raw error code the way `opennsl_errmsg` does.
///
/// Unlike [`NslStatus::from_raw`], codes outside the table are not folded
/// into `Internal`.
pub fn errmsg(code: i32) -> &'static str {
    if (NslStatus::Port.as_raw()..=NslStatus::None.as_raw()).contains(&code) {
        NslStatus::from_raw(code).message()
    } else {
        UNKNOWN_ERROR
    }
}

fn raw_message(code: &i32) -> &'static str {
    errmsg(*code)
}

/// Error type for OpenNSL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NslError {
    /// An SDK call returned a failure status.
    ///
    /// `raw` is the code exactly as the SDK returned it; `status` is its
    /// table entry, `Internal` when the table has none.
    #[error("{op} failed: {}", raw_message(.raw))]
    Status {
        op: &'static str,
        status: NslStatus,
        raw: i32,
    },

    /// The driver has not been brought up.
    #[error("{op}: OpenNSL driver not initialized")]
    Uninitialized { op: &'static str },
}

impl NslError {
    /// Creates a status error.
    pub fn status(op: &'static str, status: NslStatus) -> Self {
        NslError::Status {
            op,
            status,
            raw: status.as_raw(),
        }
    }

    /// Creates a status error from a raw return code, keeping the code.
    pub fn from_code(op: &'static str, raw: i32) -> Self {
        NslError::Status {
            op,
            status: NslStatus::from_raw(raw),
            raw,
        }
    }

    /// Name of the SDK call that failed.
    pub fn op(&self) -> &'static str {
        match self {
            NslError::Status { op, .. } | NslError::Uninitialized { op } => op,
        }
    }

    /// Status code equivalent of this error.
    pub fn code(&self) -> NslStatus {
        match self {
            NslError::Status { status, .. } => *status,
            NslError::Uninitialized { .. } => NslStatus::Init,
        }
    }

    /// The `opennsl_error_t` this error stands for, unfolded.
    pub fn raw_code(&self) -> i32 {
        match self {
            NslError::Status { raw, .. } => *raw,
            NslError::Uninitialized { .. } => NslStatus::Init.as_raw(),
        }
    }
}

/// Result type for OpenNSL operations.
pub type NslResult<T> = Result<T, NslError>;

/// Extension trait for converting raw return codes from the C API.
pub trait NslStatusExt {
    /// Converts a raw return code to a Result.
    fn check(self, op: &'static str) -> NslResult<()>;
}

impl NslStatusExt for i32 {
    fn check(self, op: &'static str) -> NslResult<()> {
        if self == 0 {
            Ok(())
        } else {
            Err(NslError::from_code(op, self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(NslStatus::from_raw(0), NslStatus::None);
        assert_eq!(NslStatus::from_raw(-7), NslStatus::NotFound);
        assert_eq!(NslStatus::from_raw(-18), NslStatus::Port);
        assert_eq!(NslStatus::from_raw(-999), NslStatus::Internal);
        assert_eq!(NslStatus::Resource.as_raw(), -14);
    }

    #[test]
    fn test_errmsg() {
        assert_eq!(errmsg(0), "Ok");
        assert_eq!(errmsg(-6), "Table full");
        assert_eq!(errmsg(-16), "Feature unavailable");
        assert_eq!(errmsg(-19), "Unknown error");
        assert_eq!(errmsg(3), "Unknown error");
    }

    #[test]
    fn test_into_result() {
        assert!(NslStatus::None.into_result("opennsl_driver_init").is_ok());

        let err = NslStatus::Full
            .into_result("opennsl_field_entry_install")
            .unwrap_err();
        assert_eq!(err.op(), "opennsl_field_entry_install");
        assert_eq!(err.code(), NslStatus::Full);
        assert_eq!(err.raw_code(), -6);
        assert_eq!(
            err.to_string(),
            "opennsl_field_entry_install failed: Table full"
        );
    }

    #[test]
    fn test_raw_code_check() {
        assert!(0_i32.check("opennsl_vlan_port_add").is_ok());
        let err = (-4_i32).check("opennsl_vlan_port_add").unwrap_err();
        assert_eq!(err, NslError::status("opennsl_vlan_port_add", NslStatus::Param));
    }

    #[test]
    fn test_out_of_table_code_is_kept() {
        let err = (-19_i32).check("opennsl_driver_init").unwrap_err();
        assert_eq!(err.raw_code(), -19);
        assert_eq!(err.code(), NslStatus::Internal);
        assert_eq!(err.to_string(), "opennsl_driver_init failed: Unknown error");

        let err = 5_i32.check("opennsl_field_entry_install").unwrap_err();
        assert_eq!(err.raw_code(), 5);
        assert_eq!(
            err.to_string(),
            "opennsl_field_entry_install failed: Unknown error"
        );
    }

    #[test]
    fn test_uninitialized_error() {
        let err = NslError::Uninitialized {
            op: "opennsl_field_group_create",
        };
        assert_eq!(err.code(), NslStatus::Init);
        assert_eq!(err.raw_code(), -17);
        assert!(err.to_string().contains("not initialized"));
    }
}
