//! Port configuration types.

use opennsl_types::PortBitmap;

/// Port sets reported by `opennsl_port_config_get`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortConfig {
    /// Ethernet ports.
    pub e: PortBitmap,
}
