//! VLAN identifiers.

use std::fmt;

/// IEEE 802.1Q VLAN identifier.
///
/// The SDK creates VLAN 1 at driver init and places nothing in it; the snake
/// base setup only ever adds ports to that default VLAN.
///
/// ```
/// use opennsl_types::VlanId;
///
/// assert_eq!(VlanId::DEFAULT.as_u16(), 1);
/// assert_eq!(VlanId::DEFAULT.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanId(u16);

impl VlanId {
    /// VLAN that exists after driver init.
    pub const DEFAULT: VlanId = VlanId(1);

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
