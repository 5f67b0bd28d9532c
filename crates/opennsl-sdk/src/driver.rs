//! [`SwitchSdk`] backed by the vendor OpenNSL library.
//!
//! With the `opennsl-link` feature the calls go through the `extern "C"`
//! declarations in [`ffi`]. Without it every call fails with
//! [`NslStatus::Unavail`], which lets the tooling build and run in
//! simulation mode on hosts that do not carry the vendor library.

use crate::api::{GroupPriority, PortConfig, QualifierSet};
use crate::error::{NslError, NslResult};
#[cfg(not(feature = "opennsl-link"))]
use crate::error::NslStatus;
use crate::sdk::SwitchSdk;
use crate::types::{EntryHandle, GroupHandle, Unit};
use opennsl_types::{PortBitmap, PortId, VlanId};

/// Handle on the OpenNSL driver of this process.
#[derive(Debug, Default)]
pub struct OpenNslDriver {
    initialized: bool,
}

impl OpenNslDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_init(&self, op: &'static str) -> NslResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(NslError::Uninitialized { op })
        }
    }
}

#[cfg(not(feature = "opennsl-link"))]
fn unavailable<T>(op: &'static str) -> NslResult<T> {
    log::debug!("{}: built without the opennsl-link feature", op);
    Err(NslError::status(op, NslStatus::Unavail))
}

#[cfg(not(feature = "opennsl-link"))]
impl SwitchSdk for OpenNslDriver {
    fn driver_init(&mut self) -> NslResult<()> {
        unavailable("opennsl_driver_init")
    }

    fn port_config_get(&mut self, _unit: Unit) -> NslResult<PortConfig> {
        self.ensure_init("opennsl_port_config_get")?;
        unavailable("opennsl_port_config_get")
    }

    fn vlan_port_add(
        &mut self,
        _unit: Unit,
        _vlan: VlanId,
        _pbmp: &PortBitmap,
        _ubmp: &PortBitmap,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_vlan_port_add")?;
        unavailable("opennsl_vlan_port_add")
    }

    fn field_group_create(
        &mut self,
        _unit: Unit,
        _qset: QualifierSet,
        _priority: GroupPriority,
    ) -> NslResult<GroupHandle> {
        self.ensure_init("opennsl_field_group_create")?;
        unavailable("opennsl_field_group_create")
    }

    fn field_entry_create(&mut self, _unit: Unit, _group: GroupHandle) -> NslResult<EntryHandle> {
        self.ensure_init("opennsl_field_entry_create")?;
        unavailable("opennsl_field_entry_create")
    }

    fn field_qualify_in_port(
        &mut self,
        _unit: Unit,
        _entry: EntryHandle,
        _port: PortId,
        _mask: u32,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_field_qualify_InPort")?;
        unavailable("opennsl_field_qualify_InPort")
    }

    fn field_action_redirect_port(
        &mut self,
        _unit: Unit,
        _entry: EntryHandle,
        _port: PortId,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_field_action_add")?;
        unavailable("opennsl_field_action_add")
    }

    fn field_entry_install(&mut self, _unit: Unit, _entry: EntryHandle) -> NslResult<()> {
        self.ensure_init("opennsl_field_entry_install")?;
        unavailable("opennsl_field_entry_install")
    }
}

#[cfg(feature = "opennsl-link")]
impl SwitchSdk for OpenNslDriver {
    fn driver_init(&mut self) -> NslResult<()> {
        if self.initialized {
            log::warn!("opennsl_driver_init called twice; ignoring");
            return Ok(());
        }
        ffi::driver_init()?;
        self.initialized = true;
        Ok(())
    }

    fn port_config_get(&mut self, unit: Unit) -> NslResult<PortConfig> {
        self.ensure_init("opennsl_port_config_get")?;
        ffi::port_config_get(unit)
    }

    fn vlan_port_add(
        &mut self,
        unit: Unit,
        vlan: VlanId,
        pbmp: &PortBitmap,
        ubmp: &PortBitmap,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_vlan_port_add")?;
        ffi::vlan_port_add(unit, vlan, pbmp, ubmp)
    }

    fn field_group_create(
        &mut self,
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    ) -> NslResult<GroupHandle> {
        self.ensure_init("opennsl_field_group_create")?;
        ffi::field_group_create(unit, qset, priority)
    }

    fn field_entry_create(&mut self, unit: Unit, group: GroupHandle) -> NslResult<EntryHandle> {
        self.ensure_init("opennsl_field_entry_create")?;
        ffi::field_entry_create(unit, group)
    }

    fn field_qualify_in_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_field_qualify_InPort")?;
        ffi::field_qualify_in_port(unit, entry, port, mask)
    }

    fn field_action_redirect_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
    ) -> NslResult<()> {
        self.ensure_init("opennsl_field_action_add")?;
        ffi::field_action_redirect_port(unit, entry, port)
    }

    fn field_entry_install(&mut self, unit: Unit, entry: EntryHandle) -> NslResult<()> {
        self.ensure_init("opennsl_field_entry_install")?;
        ffi::field_entry_install(unit, entry)
    }

    fn describe_error(&self, code: i32) -> String {
        ffi::errmsg(code)
    }
}

/// Raw libopennsl declarations and the safe wrappers over them.
///
/// Struct layouts must match the headers of the OpenNSL release the binary
/// is linked against.
#[cfg(feature = "opennsl-link")]
pub mod ffi {
    use super::*;
    use crate::error::NslStatusExt;
    use opennsl_types::PBMP_WORD_MAX;
    use std::ffi::{c_char, c_int, CStr};
    use std::ptr;

    /// `opennsl_pbmp_t`.
    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    pub struct RawPbmp {
        pub pbits: [u32; PBMP_WORD_MAX],
    }

    impl From<&PortBitmap> for RawPbmp {
        fn from(pbmp: &PortBitmap) -> Self {
            RawPbmp {
                pbits: *pbmp.words(),
            }
        }
    }

    impl From<RawPbmp> for PortBitmap {
        fn from(raw: RawPbmp) -> Self {
            PortBitmap::from_words(raw.pbits)
        }
    }

    /// `opennsl_port_config_t`.
    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    pub struct RawPortConfig {
        pub fe: RawPbmp,
        pub ge: RawPbmp,
        pub xe: RawPbmp,
        pub ce: RawPbmp,
        pub e: RawPbmp,
        pub hg: RawPbmp,
        pub sci: RawPbmp,
        pub sfi: RawPbmp,
        pub spi: RawPbmp,
        pub spi_subport: RawPbmp,
        pub port: RawPbmp,
        pub cpu: RawPbmp,
        pub all: RawPbmp,
        pub stack_int: RawPbmp,
        pub stack_ext: RawPbmp,
        pub tdm: RawPbmp,
        pub pon: RawPbmp,
        pub llid: RawPbmp,
        pub il: RawPbmp,
        pub xl: RawPbmp,
        pub rcy: RawPbmp,
        pub sat: RawPbmp,
        pub ipsec: RawPbmp,
    }

    const QSET_WORDS: usize = 32;
    const QSET_UDF_WORDS: usize = 8;

    /// `opennsl_field_qset_t`.
    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    pub struct RawQset {
        pub w: [u32; QSET_WORDS],
        pub udf_map: [u32; QSET_UDF_WORDS],
    }

    impl From<QualifierSet> for RawQset {
        fn from(qset: QualifierSet) -> Self {
            let mut raw = RawQset::default();
            for q in qset.iter() {
                let bit = q.as_raw() as usize;
                raw.w[bit / 32] |= 1 << (bit % 32);
            }
            raw
        }
    }

    /// `opennslFieldActionRedirectPort`.
    const ACTION_REDIRECT_PORT: c_int = 28;

    /// `_SHR_E_LIMIT`; `_shr_errmsg` has one slot per code above it plus a
    /// trailing "Unknown error".
    const E_LIMIT: c_int = -19;
    const ERRMSG_SLOTS: usize = 20;

    /// `opennsl_init_t` is never filled in; init always passes NULL.
    #[repr(C)]
    pub struct RawInit {
        _opaque: [u8; 0],
    }

    extern "C" {
        /// Backing table of the `opennsl_errmsg` macro.
        static _shr_errmsg: [*const c_char; ERRMSG_SLOTS];

        fn opennsl_driver_init(init: *mut RawInit) -> c_int;
        fn opennsl_port_config_get(unit: c_int, config: *mut RawPortConfig) -> c_int;
        fn opennsl_vlan_port_add(unit: c_int, vid: u16, pbmp: RawPbmp, ubmp: RawPbmp) -> c_int;
        fn opennsl_field_group_create(
            unit: c_int,
            qset: RawQset,
            pri: c_int,
            group: *mut c_int,
        ) -> c_int;
        fn opennsl_field_entry_create(unit: c_int, group: c_int, entry: *mut c_int) -> c_int;
        fn opennsl_field_qualify_InPort(unit: c_int, entry: c_int, data: c_int, mask: c_int)
            -> c_int;
        fn opennsl_field_action_add(
            unit: c_int,
            entry: c_int,
            action: c_int,
            param0: u32,
            param1: u32,
        ) -> c_int;
        fn opennsl_field_entry_install(unit: c_int, entry: c_int) -> c_int;
    }

    /// `opennsl_errmsg(rv)`.
    pub fn errmsg(rv: i32) -> String {
        let slot = if rv <= 0 && rv > E_LIMIT { -rv } else { -E_LIMIT };
        // Safety: slot is in 0..ERRMSG_SLOTS and every slot is a static C string.
        let msg = unsafe { _shr_errmsg[slot as usize] };
        if msg.is_null() {
            return crate::error::errmsg(rv).to_string();
        }
        // Safety: non-null entries point at NUL-terminated literals.
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }

    pub fn driver_init() -> NslResult<()> {
        // Safety: NULL asks the SDK for platform defaults.
        unsafe { opennsl_driver_init(ptr::null_mut()) }.check("opennsl_driver_init")
    }

    pub fn port_config_get(unit: Unit) -> NslResult<PortConfig> {
        let mut raw = RawPortConfig::default();
        // Safety: raw is a valid, writable opennsl_port_config_t.
        unsafe { opennsl_port_config_get(unit.as_raw(), &mut raw) }
            .check("opennsl_port_config_get")?;
        Ok(PortConfig { e: raw.e.into() })
    }

    pub fn vlan_port_add(
        unit: Unit,
        vlan: VlanId,
        pbmp: &PortBitmap,
        ubmp: &PortBitmap,
    ) -> NslResult<()> {
        // Safety: bitmaps are passed by value.
        unsafe { opennsl_vlan_port_add(unit.as_raw(), vlan.as_u16(), pbmp.into(), ubmp.into()) }
            .check("opennsl_vlan_port_add")
    }

    pub fn field_group_create(
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    ) -> NslResult<GroupHandle> {
        let mut group: c_int = 0;
        // Safety: group is a valid out-pointer.
        unsafe { opennsl_field_group_create(unit.as_raw(), qset.into(), priority.as_raw(), &mut group) }
            .check("opennsl_field_group_create")?;
        Ok(GroupHandle::from_raw(group))
    }

    pub fn field_entry_create(unit: Unit, group: GroupHandle) -> NslResult<EntryHandle> {
        let mut entry: c_int = 0;
        // Safety: entry is a valid out-pointer.
        unsafe { opennsl_field_entry_create(unit.as_raw(), group.as_raw(), &mut entry) }
            .check("opennsl_field_entry_create")?;
        Ok(EntryHandle::from_raw(entry))
    }

    pub fn field_qualify_in_port(
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    ) -> NslResult<()> {
        // Safety: plain integer arguments.
        unsafe {
            opennsl_field_qualify_InPort(unit.as_raw(), entry.as_raw(), port.as_raw(), mask as c_int)
        }
        .check("opennsl_field_qualify_InPort")
    }

    /// Redirect to `port` on module 0.
    pub fn field_action_redirect_port(unit: Unit, entry: EntryHandle, port: PortId) -> NslResult<()> {
        // Safety: plain integer arguments.
        unsafe {
            opennsl_field_action_add(
                unit.as_raw(),
                entry.as_raw(),
                ACTION_REDIRECT_PORT,
                0,
                u32::from(port.get()),
            )
        }
        .check("opennsl_field_action_add")
    }

    pub fn field_entry_install(unit: Unit, entry: EntryHandle) -> NslResult<()> {
        // Safety: plain integer arguments.
        unsafe { opennsl_field_entry_install(unit.as_raw(), entry.as_raw()) }
            .check("opennsl_field_entry_install")
    }
}
