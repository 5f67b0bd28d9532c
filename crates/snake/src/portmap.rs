//! Port map: which port each ingress port is patched to.
//!
//! The map is a fixed-size table indexed by `port - 1`. It is built once,
//! either by [`PortMap::snake`] (adjacent pairs over every port) or by
//! [`PortMap::from_pairs`] (explicit `A:B` tokens), and then only read.

use opennsl_types::PortId;
use tracing::info;

use crate::error::{PairSide, UsageError};

/// Default table size. Valid ports are `1..DEFAULT_MAX_PORTS`.
pub const DEFAULT_MAX_PORTS: u16 = 256;

/// Fixed-capacity ingress-port to egress-port table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMap {
    slots: Vec<Option<PortId>>,
}

impl PortMap {
    /// An empty map with `max_ports` slots.
    pub fn new(max_ports: u16) -> Self {
        Self {
            slots: vec![None; usize::from(max_ports)],
        }
    }

    /// Pairs every port with its neighbour: 1<->2, 3<->4, ...
    ///
    /// Slot `n - 1` therefore maps port `n - 1` to `n`, one past the last
    /// port a pair token may name.
    ///
    /// # Panics
    ///
    /// Panics if `max_ports` is odd.
    pub fn snake(max_ports: u16) -> Self {
        assert!(
            max_ports % 2 == 0,
            "snake mapping needs an even port count, got {max_ports}"
        );
        let mut map = Self::new(max_ports);
        for i in (0..map.slots.len()).step_by(2) {
            map.slots[i] = PortId::from_index(i + 1);
            map.slots[i + 1] = PortId::from_index(i);
        }
        map
    }

    /// Builds a map from `A:B` tokens, in order. Later tokens overwrite
    /// earlier ones for the same port.
    ///
    /// # Errors
    ///
    /// Fails on the first token that does not parse or names a port outside
    /// `1..max_ports`; no partial map is returned.
    pub fn from_pairs<I, S>(max_ports: u16, tokens: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new(max_ports);
        for token in tokens {
            let (a, b) = map.apply_pair(token.as_ref())?;
            info!("Patching {} <---> {}", a, b);
        }
        Ok(map)
    }

    /// Parses one `A:B` token and records the pair in both directions.
    pub fn apply_pair(&mut self, token: &str) -> Result<(PortId, PortId), UsageError> {
        let (a, b) = parse_pair(token, self.capacity())?;
        self.slots[a.index()] = Some(b);
        self.slots[b.index()] = Some(a);
        Ok((a, b))
    }

    /// Destination for `src`, if it is patched.
    pub fn get(&self, src: PortId) -> Option<PortId> {
        self.slots.get(src.index()).copied().flatten()
    }

    /// `(src, dst)` for every patched port, in ascending `src` order.
    pub fn entries(&self) -> impl Iterator<Item = (PortId, PortId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, dst)| Some((PortId::from_index(i)?, (*dst)?)))
    }

    /// Number of patched ports.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of slots (`MAXPORTS`).
    pub fn capacity(&self) -> u16 {
        // Built from a u16, so this cannot truncate.
        self.slots.len() as u16
    }

    /// The table as plain numbers, `0` for unpatched slots.
    pub fn as_raw(&self) -> Vec<u16> {
        self.slots
            .iter()
            .map(|s| s.map_or(0, |p| p.get()))
            .collect()
    }
}

/// Parses an `A:B` token against a table of `max_ports` slots.
///
/// The token must start with a digit and contain a second `:`-separated
/// field. Each field is read like C `atoi`: leading whitespace, an optional
/// sign, then as many digits as follow. Empty fields between separators are
/// skipped and fields after the second are ignored.
pub fn parse_pair(token: &str, max_ports: u16) -> Result<(PortId, PortId), UsageError> {
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(UsageError::unknown_parameter(token));
    }

    let mut fields = token.split(':').filter(|f| !f.is_empty());
    let (Some(first), Some(second)) = (fields.next(), fields.next()) else {
        return Err(UsageError::malformed_pair(token));
    };

    let a = checked_port(token, PairSide::A, atoi(first), max_ports)?;
    let b = checked_port(token, PairSide::B, atoi(second), max_ports)?;
    Ok((a, b))
}

fn checked_port(
    token: &str,
    side: PairSide,
    value: i64,
    max_ports: u16,
) -> Result<PortId, UsageError> {
    u16::try_from(value)
        .ok()
        .filter(|p| *p < max_ports)
        .and_then(PortId::new)
        .ok_or_else(|| UsageError::Range {
            token: token.to_string(),
            side,
            value,
            max_ports,
        })
}

/// C `atoi`, saturating instead of overflowing.
fn atoi(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
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
    fn test_snake_six_ports() {
        assert_eq!(PortMap::snake(6).as_raw(), vec![2, 1, 4, 3, 6, 5]);
    }

    #[test]
    fn test_snake_pairs_every_slot() {
        for n in (2..=DEFAULT_MAX_PORTS).step_by(2) {
            let raw = PortMap::snake(n).as_raw();
            for k in 0..usize::from(n / 2) {
                assert_eq!(usize::from(raw[2 * k]), 2 * k + 2);
                assert_eq!(usize::from(raw[2 * k + 1]), 2 * k + 1);
            }
        }
    }

    #[test]
    fn test_snake_default_size() {
        let map = PortMap::snake(DEFAULT_MAX_PORTS);
        assert_eq!(map.len(), 256);
        assert_eq!(map.get(port(255)), Some(port(256)));
        assert_eq!(map.get(port(256)), Some(port(255)));
    }

    #[test]
    #[should_panic(expected = "even port count")]
    fn test_snake_odd_count_panics() {
        let _ = PortMap::snake(5);
    }

    #[test]
    fn test_explicit_pairs() {
        let map = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["1:2", "3:4"]).unwrap();
        let raw = map.as_raw();
        assert_eq!(&raw[..4], &[2, 1, 4, 3]);
        assert!(raw[4..].iter().all(|p| *p == 0));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_pair_is_symmetric_and_idempotent() {
        let once = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["7:200"]).unwrap();
        let twice = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["7:200", "7:200"]).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.get(port(7)), Some(port(200)));
        assert_eq!(once.get(port(200)), Some(port(7)));
    }

    #[test]
    fn test_last_pair_wins() {
        let map = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["1:2", "1:3"]).unwrap();
        assert_eq!(map.get(port(1)), Some(port(3)));
        assert_eq!(map.get(port(3)), Some(port(1)));
        // The earlier partner keeps its stale reverse mapping.
        assert_eq!(map.get(port(2)), Some(port(1)));
    }

    #[test]
    fn test_self_patch_is_accepted() {
        let map = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["9:9"]).unwrap();
        assert_eq!(map.get(port(9)), Some(port(9)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_lower_bound_rejected() {
        let err = parse_pair("0:5", DEFAULT_MAX_PORTS).unwrap_err();
        assert_eq!(
            err,
            UsageError::Range {
                token: "0:5".to_string(),
                side: PairSide::A,
                value: 0,
                max_ports: DEFAULT_MAX_PORTS,
            }
        );
    }

    #[test]
    fn test_upper_bound_rejected() {
        assert!(parse_pair("1:255", DEFAULT_MAX_PORTS).is_ok());
        let err = parse_pair("1:256", DEFAULT_MAX_PORTS).unwrap_err();
        assert!(matches!(
            err,
            UsageError::Range {
                side: PairSide::B,
                value: 256,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_colon_rejected() {
        assert_eq!(
            parse_pair("5", DEFAULT_MAX_PORTS),
            Err(UsageError::malformed_pair("5"))
        );
        assert_eq!(
            parse_pair("5:", DEFAULT_MAX_PORTS),
            Err(UsageError::malformed_pair("5:"))
        );
    }

    #[test]
    fn test_non_digit_start_rejected() {
        for token in ["abc:5", "-1:2", ":1:2", "", " 1:2"] {
            assert_eq!(
                parse_pair(token, DEFAULT_MAX_PORTS),
                Err(UsageError::unknown_parameter(token)),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_atoi_field_semantics() {
        assert_eq!(parse_pair("3x:4", 256).unwrap(), (port(3), port(4)));
        assert_eq!(parse_pair("1::2", 256).unwrap(), (port(1), port(2)));
        assert_eq!(parse_pair("1:2:99", 256).unwrap(), (port(1), port(2)));
        assert_eq!(parse_pair("1:+2", 256).unwrap(), (port(1), port(2)));
        assert!(matches!(
            parse_pair("1:x", 256),
            Err(UsageError::Range { value: 0, .. })
        ));
        assert!(matches!(
            parse_pair("1:-3", 256),
            Err(UsageError::Range { value: -3, .. })
        ));
        assert!(matches!(
            parse_pair("99999999999999999999999:1", 256),
            Err(UsageError::Range { value: i64::MAX, .. })
        ));
    }

    #[test]
    fn test_first_bad_token_fails_whole_map() {
        let err = PortMap::from_pairs(DEFAULT_MAX_PORTS, ["1:2", "bogus", "3:4"]).unwrap_err();
        assert_eq!(err, UsageError::unknown_parameter("bogus"));
    }

    #[test]
    fn test_entries_in_port_order() {
        let map = PortMap::from_pairs(8, ["5:6", "1:2"]).unwrap();
        let entries: Vec<(u16, u16)> = map.entries().map(|(s, d)| (s.get(), d.get())).collect();
        assert_eq!(entries, vec![(1, 2), (2, 1), (5, 6), (6, 5)]);
    }

    #[test]
    fn test_smaller_table_bounds() {
        assert!(parse_pair("7:3", 8).is_ok());
        assert!(parse_pair("8:3", 8).is_err());
    }
}
