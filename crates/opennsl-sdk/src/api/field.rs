//! Field processor (ingress classification) types.
//!
//! A field group fixes which packet fields its entries may match on. Each
//! entry in the group carries qualifiers (the match) and actions.

use std::fmt;

/// Mask matching every bit of a qualifier.
pub const EXACT_MATCH_MASK: u32 = 0xffff_ffff;

/// Packet fields a group can qualify on.
///
/// Discriminants follow `opennsl_field_qualify_t`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qualifier {
    /// `opennslFieldQualifyInPort`: the single ingress port.
    InPort = 6,
}

impl Qualifier {
    const ALL: [Qualifier; 1] = [Qualifier::InPort];

    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

/// A qualifier set (`opennsl_field_qset_t`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QualifierSet {
    bits: u64,
}

impl QualifierSet {
    /// `OPENNSL_FIELD_QSET_INIT`.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// `OPENNSL_FIELD_QSET_ADD`.
    pub fn add(mut self, qualifier: Qualifier) -> Self {
        self.bits |= 1 << qualifier.as_raw();
        self
    }

    /// `OPENNSL_FIELD_QSET_TEST`.
    pub fn contains(&self, qualifier: Qualifier) -> bool {
        self.bits & (1 << qualifier.as_raw()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Qualifiers in the set, in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = Qualifier> + '_ {
        Qualifier::ALL
            .into_iter()
            .filter(move |q| self.contains(*q))
    }
}

impl fmt::Debug for QualifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Group priority passed to `opennsl_field_group_create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupPriority(i32);

impl GroupPriority {
    /// `OPENNSL_FIELD_GROUP_PRIO_ANY`: let the SDK pick a slice.
    pub const ANY: GroupPriority = GroupPriority(-2_147_483_647);

    pub const fn as_raw(self) -> i32 {
        self.0
    }
}
