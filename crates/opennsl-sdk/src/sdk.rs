//! The switch-control capability interface.
//!
//! [`SwitchSdk`] is the narrow slice of OpenNSL that patching needs. The
//! linked driver ([`crate::OpenNslDriver`]) and the in-memory
//! [`crate::SimulatedSwitch`] both implement it, so callers never touch the
//! C API directly.

use crate::api::{GroupPriority, PortConfig, QualifierSet};
use crate::error::{errmsg, NslResult};
use crate::types::{EntryHandle, GroupHandle, Unit};
use opennsl_types::{PortBitmap, PortId, VlanId};

pub trait SwitchSdk {
    /// `opennsl_driver_init`.
    fn driver_init(&mut self) -> NslResult<()>;

    /// `opennsl_port_config_get`.
    fn port_config_get(&mut self, unit: Unit) -> NslResult<PortConfig>;

    /// `opennsl_vlan_port_add`: add `pbmp` to `vlan`, with the `ubmp`
    /// subset egressing untagged.
    fn vlan_port_add(
        &mut self,
        unit: Unit,
        vlan: VlanId,
        pbmp: &PortBitmap,
        ubmp: &PortBitmap,
    ) -> NslResult<()>;

    /// `opennsl_field_group_create`.
    fn field_group_create(
        &mut self,
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    ) -> NslResult<GroupHandle>;

    /// `opennsl_field_entry_create`.
    fn field_entry_create(&mut self, unit: Unit, group: GroupHandle) -> NslResult<EntryHandle>;

    /// `opennsl_field_qualify_InPort`.
    fn field_qualify_in_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    ) -> NslResult<()>;

    /// `opennsl_field_action_add` with `opennslFieldActionRedirectPort`,
    /// module 0.
    fn field_action_redirect_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
    ) -> NslResult<()>;

    /// `opennsl_field_entry_install`.
    fn field_entry_install(&mut self, unit: Unit, entry: EntryHandle) -> NslResult<()>;

    /// `opennsl_errmsg`: text for a raw `opennsl_error_t`, including codes
    /// outside the status table.
    fn describe_error(&self, code: i32) -> String {
        errmsg(code).to_string()
    }
}

impl<S: SwitchSdk + ?Sized> SwitchSdk for Box<S> {
    fn driver_init(&mut self) -> NslResult<()> {
        (**self).driver_init()
    }

    fn port_config_get(&mut self, unit: Unit) -> NslResult<PortConfig> {
        (**self).port_config_get(unit)
    }

    fn vlan_port_add(
        &mut self,
        unit: Unit,
        vlan: VlanId,
        pbmp: &PortBitmap,
        ubmp: &PortBitmap,
    ) -> NslResult<()> {
        (**self).vlan_port_add(unit, vlan, pbmp, ubmp)
    }

    fn field_group_create(
        &mut self,
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    ) -> NslResult<GroupHandle> {
        (**self).field_group_create(unit, qset, priority)
    }

    fn field_entry_create(&mut self, unit: Unit, group: GroupHandle) -> NslResult<EntryHandle> {
        (**self).field_entry_create(unit, group)
    }

    fn field_qualify_in_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    ) -> NslResult<()> {
        (**self).field_qualify_in_port(unit, entry, port, mask)
    }

    fn field_action_redirect_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
    ) -> NslResult<()> {
        (**self).field_action_redirect_port(unit, entry, port)
    }

    fn field_entry_install(&mut self, unit: Unit, entry: EntryHandle) -> NslResult<()> {
        (**self).field_entry_install(unit, entry)
    }

    fn describe_error(&self, code: i32) -> String {
        (**self).describe_error(code)
    }
}
