//! Fixed-width port bitmaps.
//!
//! Mirrors `opennsl_pbmp_t`: an array of 32-bit words where bit `p % 32` of
//! word `p / 32` marks port `p`. The layout is `#[repr(C)]` so a bitmap can
//! be handed straight to the driver.

use crate::{ParseError, PortId};
use std::fmt;

/// Number of ports a bitmap can hold.
pub const PBMP_PORT_MAX: usize = 256;

/// Number of 32-bit words in a bitmap.
pub const PBMP_WORD_MAX: usize = PBMP_PORT_MAX / 32;

/// A set of switch ports.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PortBitmap {
    words: [u32; PBMP_WORD_MAX],
}

impl PortBitmap {
    /// Creates an empty bitmap.
    pub const fn new() -> Self {
        Self {
            words: [0; PBMP_WORD_MAX],
        }
    }

    /// Adds a port to the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the port number does not fit in the bitmap.
    pub fn insert(&mut self, port: PortId) -> Result<(), ParseError> {
        let bit = usize::from(port.get());
        if bit >= PBMP_PORT_MAX {
            return Err(ParseError::PortOutOfBitmap(port.get()));
        }
        self.words[bit / 32] |= 1 << (bit % 32);
        Ok(())
    }

    /// Returns true if the port is a member.
    pub fn contains(&self, port: PortId) -> bool {
        let bit = usize::from(port.get());
        bit < PBMP_PORT_MAX && self.words[bit / 32] & (1 << (bit % 32)) != 0
    }

    /// Number of member ports.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Iterates member ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PortId> + '_ {
        (1..PBMP_PORT_MAX)
            .filter(move |bit| self.words[bit / 32] & (1 << (bit % 32)) != 0)
            .filter_map(|bit| u16::try_from(bit).ok().and_then(PortId::new))
    }

    /// Raw words, in the order the driver expects them.
    pub const fn words(&self) -> &[u32; PBMP_WORD_MAX] {
        &self.words
    }

    /// Builds a bitmap from raw driver words.
    pub const fn from_words(words: [u32; PBMP_WORD_MAX]) -> Self {
        Self { words }
    }
}

impl fmt::Debug for PortBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| p.get())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn port(p: u16) -> PortId {
        PortId::new(p).unwrap()
    }

    #[test]
    fn test_insert_and_contains() {
        let mut pbmp = PortBitmap::new();
        assert!(pbmp.is_empty());

        pbmp.insert(port(1)).unwrap();
        pbmp.insert(port(33)).unwrap();
        pbmp.insert(port(255)).unwrap();

        assert!(pbmp.contains(port(1)));
        assert!(pbmp.contains(port(33)));
        assert!(pbmp.contains(port(255)));
        assert!(!pbmp.contains(port(2)));
        assert_eq!(pbmp.count(), 3);
    }

    #[test]
    fn test_word_layout() {
        let mut pbmp = PortBitmap::new();
        pbmp.insert(port(1)).unwrap();
        pbmp.insert(port(32)).unwrap();
        assert_eq!(pbmp.words()[0], 0b10);
        assert_eq!(pbmp.words()[1], 0b1);
    }

    #[test]
    fn test_out_of_range() {
        let mut pbmp = PortBitmap::new();
        assert_eq!(pbmp.insert(port(256)), Err(ParseError::PortOutOfBitmap(256)));
        assert!(!pbmp.contains(port(256)));
    }

    #[test]
    fn test_iter_is_ascending() {
        let mut pbmp = PortBitmap::new();
        for p in [40, 2, 4] {
            pbmp.insert(port(p)).unwrap();
        }

        let members: Vec<u16> = pbmp.iter().map(|p| p.get()).collect();
        assert_eq!(members, vec![2, 4, 40]);
        assert_eq!(format!("{:?}", pbmp), "{2, 4, 40}");
        assert_eq!(PortBitmap::from_words(*pbmp.words()), pbmp);
    }
}
