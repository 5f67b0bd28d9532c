//! Type-safe OpenNSL handle wrappers.
//!
//! The C API hands out plain `int` handles for field groups and field entries.
//! Wrapping them keeps a group handle from being passed where an entry is
//! expected.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw handle type (matches `opennsl_field_group_t` / `opennsl_field_entry_t`).
pub type RawHandle = i32;

/// Marker trait for handle kinds.
pub trait HandleKind: Send + Sync + 'static {
    /// Returns the handle kind name for debugging.
    fn type_name() -> &'static str;
}

/// A typed SDK handle.
///
/// ```
/// use opennsl_sdk::{EntryHandle, GroupHandle};
///
/// let group = GroupHandle::from_raw(1);
/// let entry = EntryHandle::from_raw(1);
///
/// // fn install(e: EntryHandle) {}
/// // install(group);  // Error: expected EntryHandle, found GroupHandle
/// assert_eq!(group.as_raw(), entry.as_raw());
/// ```
pub struct Handle<T: HandleKind> {
    raw: RawHandle,
    _marker: PhantomData<T>,
}

impl<T: HandleKind> Handle<T> {
    /// Wraps a raw handle returned by the SDK.
    pub const fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the raw handle value.
    pub const fn as_raw(&self) -> RawHandle {
        self.raw
    }
}

impl<T: HandleKind> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: HandleKind> Copy for Handle<T> {}

impl<T: HandleKind> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::type_name(), self.raw)
    }
}

impl<T: HandleKind> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<T: HandleKind> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: HandleKind> Eq for Handle<T> {}

impl<T: HandleKind> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

macro_rules! define_handle_kind {
    ($name:ident, $type_name:literal, $alias:ident) => {
        #[doc = concat!("Marker type for ", $type_name, " handles.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl HandleKind for $name {
            fn type_name() -> &'static str {
                $type_name
            }
        }

        #[doc = concat!("Handle to a ", $type_name, ".")]
        pub type $alias = Handle<$name>;
    };
}

define_handle_kind!(FieldGroupKind, "FieldGroup", GroupHandle);
define_handle_kind!(FieldEntryKind, "FieldEntry", EntryHandle);

/// Switch chip index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unit(i32);

impl Unit {
    /// The first (and, for this tooling, only) chip.
    pub const DEFAULT: Unit = Unit(0);

    pub const fn as_raw(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_debug() {
        let group = GroupHandle::from_raw(3);
        assert_eq!(format!("{:?}", group), "FieldGroup(3)");
        assert_eq!(group.to_string(), "3");

        let entry = EntryHandle::from_raw(12);
        assert_eq!(format!("{:?}", entry), "FieldEntry(12)");
    }

    #[test]
    fn test_handle_equality() {
        assert_eq!(EntryHandle::from_raw(1), EntryHandle::from_raw(1));
        assert_ne!(EntryHandle::from_raw(1), EntryHandle::from_raw(2));
    }

    #[test]
    fn test_default_unit() {
        assert_eq!(Unit::default(), Unit::DEFAULT);
        assert_eq!(Unit::DEFAULT.as_raw(), 0);
    }
}
