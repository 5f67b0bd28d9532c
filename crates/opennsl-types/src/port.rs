//! Switch port numbers.

use std::fmt;
use std::num::NonZeroU16;

/// A front-panel port number as understood by the SDK.
///
/// Ports are numbered from 1. Port 0 is reserved and cannot be represented,
/// so an `Option<PortId>` is the same size as a `u16` and reads naturally as
/// "mapped or not".
///
/// # Examples
///
/// ```
/// use opennsl_types::PortId;
///
/// let port = PortId::new(7).unwrap();
/// assert_eq!(port.get(), 7);
/// assert_eq!(port.index(), 6);
///
/// assert!(PortId::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(NonZeroU16);

impl PortId {
    /// Creates a port number, returning `None` for the reserved port 0.
    pub const fn new(port: u16) -> Option<Self> {
        match NonZeroU16::new(port) {
            Some(p) => Some(PortId(p)),
            None => None,
        }
    }

    /// Creates the port whose zero-based table index is `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_add(1)
            .and_then(|port| u16::try_from(port).ok())
            .and_then(Self::new)
    }

    /// Returns the port number.
    pub const fn get(&self) -> u16 {
        self.0.get()
    }

    /// Returns the zero-based index used by port tables (`port - 1`).
    pub const fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    /// Returns the port number in the signed form the C API takes.
    pub const fn as_raw(&self) -> i32 {
        self.0.get() as i32
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_port_zero_is_reserved() {
        assert!(PortId::new(0).is_none());
        assert_eq!(PortId::new(1).map(|p| p.get()), Some(1));
    }

    #[test]
    fn test_index_round_trip() {
        let port = PortId::from_index(0).unwrap();
        assert_eq!(port.get(), 1);
        assert_eq!(port.index(), 0);

        let port = PortId::from_index(255).unwrap();
        assert_eq!(port.get(), 256);
    }

    #[test]
    fn test_from_index_overflow() {
        assert_eq!(
            PortId::from_index(usize::from(u16::MAX) - 1).map(|p| p.get()),
            Some(u16::MAX)
        );
        assert!(PortId::from_index(usize::from(u16::MAX)).is_none());
        assert!(PortId::from_index(usize::MAX).is_none());
    }

    #[test]
    fn test_option_is_niche_packed() {
        assert_eq!(
            std::mem::size_of::<Option<PortId>>(),
            std::mem::size_of::<u16>()
        );
    }

    #[test]
    fn test_display_and_raw() {
        let port = PortId::new(42).unwrap();
        assert_eq!(port.to_string(), "42");
        assert_eq!(port.as_raw(), 42_i32);
    }
}
