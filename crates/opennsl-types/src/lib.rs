//! Common types for programming an OpenNSL switch.
//!
//! This crate provides type-safe representations of the few primitives the
//! snake tooling passes to the switch SDK:
//!
//! - [`PortId`]: front-panel port numbers (1-based, 0 is reserved)
//! - [`PortBitmap`]: fixed-width port sets, layout-compatible with `opennsl_pbmp_t`
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers

mod bitmap;
mod port;
mod vlan;

pub use bitmap::{PortBitmap, PBMP_PORT_MAX, PBMP_WORD_MAX};
pub use port::PortId;
pub use vlan::VlanId;

/// Error for values that do not fit the SDK's types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("port {0} does not fit in a port bitmap (max {max})", max = PBMP_PORT_MAX - 1)]
    PortOutOfBitmap(u16),
}
