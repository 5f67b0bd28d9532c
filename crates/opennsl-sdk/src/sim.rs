//! In-memory switch for dry runs and tests.
//!
//! [`SimulatedSwitch`] implements [`SwitchSdk`] without hardware. It records
//! every call in order, hands out increasing handle numbers, tracks which
//! field entries were installed, and can be told to fail selected calls.

use std::collections::BTreeMap;

use crate::api::{GroupPriority, PortConfig, QualifierSet};
use crate::error::{NslError, NslResult, NslStatus};
use crate::sdk::SwitchSdk;
use crate::types::{EntryHandle, GroupHandle, RawHandle, Unit};
use opennsl_types::{PortBitmap, PortId, VlanId, PBMP_PORT_MAX};

/// Number of front-panel ports a default simulated switch reports.
pub const DEFAULT_SIM_PORTS: u16 = 32;

/// SDK operations, used to select which calls a fault applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DriverInit,
    PortConfigGet,
    VlanPortAdd,
    FieldGroupCreate,
    FieldEntryCreate,
    FieldQualifyInPort,
    FieldActionAdd,
    FieldEntryInstall,
}

impl Operation {
    /// Name of the C function this operation stands for.
    pub const fn c_name(self) -> &'static str {
        match self {
            Operation::DriverInit => "opennsl_driver_init",
            Operation::PortConfigGet => "opennsl_port_config_get",
            Operation::VlanPortAdd => "opennsl_vlan_port_add",
            Operation::FieldGroupCreate => "opennsl_field_group_create",
            Operation::FieldEntryCreate => "opennsl_field_entry_create",
            Operation::FieldQualifyInPort => "opennsl_field_qualify_InPort",
            Operation::FieldActionAdd => "opennsl_field_action_add",
            Operation::FieldEntryInstall => "opennsl_field_entry_install",
        }
    }
}

/// One recorded SDK call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    DriverInit,
    PortConfigGet {
        unit: Unit,
    },
    VlanPortAdd {
        unit: Unit,
        vlan: VlanId,
        pbmp: PortBitmap,
        ubmp: PortBitmap,
    },
    FieldGroupCreate {
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    },
    FieldEntryCreate {
        unit: Unit,
        group: GroupHandle,
    },
    FieldQualifyInPort {
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    },
    FieldActionRedirectPort {
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
    },
    FieldEntryInstall {
        unit: Unit,
        entry: EntryHandle,
    },
}

impl SdkCall {
    pub fn operation(&self) -> Operation {
        match self {
            SdkCall::DriverInit => Operation::DriverInit,
            SdkCall::PortConfigGet { .. } => Operation::PortConfigGet,
            SdkCall::VlanPortAdd { .. } => Operation::VlanPortAdd,
            SdkCall::FieldGroupCreate { .. } => Operation::FieldGroupCreate,
            SdkCall::FieldEntryCreate { .. } => Operation::FieldEntryCreate,
            SdkCall::FieldQualifyInPort { .. } => Operation::FieldQualifyInPort,
            SdkCall::FieldActionRedirectPort { .. } => Operation::FieldActionAdd,
            SdkCall::FieldEntryInstall { .. } => Operation::FieldEntryInstall,
        }
    }
}

/// Which calls of an operation a fault hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultScope {
    Every,
    /// Calls concerning entries that qualify on this in-port.
    InPort(PortId),
    /// The n-th call of the operation, counting from 0.
    Nth(usize),
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    op: Operation,
    scope: FaultScope,
    /// Raw `opennsl_error_t` to return.
    code: i32,
}

#[derive(Debug, Clone, Default)]
struct SimEntry {
    in_port: Option<PortId>,
    redirect: Option<PortId>,
    installed: bool,
}

/// A switch that lives in memory.
#[derive(Debug)]
pub struct SimulatedSwitch {
    ports: PortBitmap,
    initialized: bool,
    calls: Vec<SdkCall>,
    faults: Vec<Fault>,
    groups: Vec<GroupHandle>,
    entries: BTreeMap<RawHandle, SimEntry>,
    vlan_members: BTreeMap<VlanId, (PortBitmap, PortBitmap)>,
    next_handle: RawHandle,
}

impl Default for SimulatedSwitch {
    fn default() -> Self {
        Self::with_ports(DEFAULT_SIM_PORTS)
    }
}

impl SimulatedSwitch {
    /// Switch reporting Ethernet ports `1..=num_ports`.
    ///
    /// Ports that do not fit a port bitmap are left out.
    pub fn with_ports(num_ports: u16) -> Self {
        let mut ports = PortBitmap::new();
        for p in (1..=num_ports).filter_map(PortId::new) {
            if usize::from(p.get()) >= PBMP_PORT_MAX {
                break;
            }
            // Cannot fail: bounded above.
            let _ = ports.insert(p);
        }
        Self {
            ports,
            initialized: false,
            calls: Vec::new(),
            faults: Vec::new(),
            groups: Vec::new(),
            entries: BTreeMap::new(),
            vlan_members: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// Fails every call of `op` with `status`.
    pub fn fail_on(&mut self, op: Operation, status: NslStatus) -> &mut Self {
        self.fail_on_code(op, status.as_raw())
    }

    /// Fails every call of `op` with a raw return code, which need not be
    /// one the status table knows.
    pub fn fail_on_code(&mut self, op: Operation, code: i32) -> &mut Self {
        self.faults.push(Fault {
            op,
            scope: FaultScope::Every,
            code,
        });
        self
    }

    /// Fails calls of `op` that concern the rule for `in_port`.
    ///
    /// `opennsl_field_entry_create` runs before the entry has a port, so
    /// port-scoped faults never fire for [`Operation::FieldEntryCreate`];
    /// use [`SimulatedSwitch::fail_nth`] for that step.
    pub fn fail_on_port(&mut self, op: Operation, in_port: PortId, status: NslStatus) -> &mut Self {
        self.faults.push(Fault {
            op,
            scope: FaultScope::InPort(in_port),
            code: status.as_raw(),
        });
        self
    }

    /// Fails the `n`-th call (0-based) of `op`.
    pub fn fail_nth(&mut self, op: Operation, n: usize, status: NslStatus) -> &mut Self {
        self.faults.push(Fault {
            op,
            scope: FaultScope::Nth(n),
            code: status.as_raw(),
        });
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[SdkCall] {
        &self.calls
    }

    /// Number of calls made of `op`.
    pub fn call_count(&self, op: Operation) -> usize {
        self.calls.iter().filter(|c| c.operation() == op).count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Groups created so far.
    pub fn groups(&self) -> &[GroupHandle] {
        &self.groups
    }

    /// `(in_port, redirect_port)` of every installed entry, by entry handle.
    pub fn installed_rules(&self) -> Vec<(PortId, PortId)> {
        self.entries
            .values()
            .filter(|e| e.installed)
            .filter_map(|e| Some((e.in_port?, e.redirect?)))
            .collect()
    }

    /// Member and untagged sets of `vlan`, if any ports were added.
    pub fn vlan_members(&self, vlan: VlanId) -> Option<&(PortBitmap, PortBitmap)> {
        self.vlan_members.get(&vlan)
    }

    fn record(&mut self, call: SdkCall) -> NslResult<()> {
        let op = call.operation();
        let nth = self.call_count(op);
        let in_port = self.in_port_of(&call);
        self.calls.push(call);

        let hit = self.faults.iter().find(|f| {
            f.op == op
                && match f.scope {
                    FaultScope::Every => true,
                    FaultScope::InPort(p) => in_port == Some(p),
                    FaultScope::Nth(n) => n == nth,
                }
        });
        if let Some(fault) = hit {
            log::debug!("simulated fault: {} -> {}", op.c_name(), fault.code);
            return Err(NslError::from_code(op.c_name(), fault.code));
        }

        if op != Operation::DriverInit && !self.initialized {
            return Err(NslError::status(op.c_name(), NslStatus::Init));
        }
        Ok(())
    }

    fn in_port_of(&self, call: &SdkCall) -> Option<PortId> {
        match call {
            SdkCall::FieldQualifyInPort { port, .. } => Some(*port),
            SdkCall::FieldActionRedirectPort { entry, .. }
            | SdkCall::FieldEntryInstall { entry, .. } => {
                self.entries.get(&entry.as_raw()).and_then(|e| e.in_port)
            }
            _ => None,
        }
    }

    fn entry_mut(&mut self, op: Operation, entry: EntryHandle) -> NslResult<&mut SimEntry> {
        self.entries
            .get_mut(&entry.as_raw())
            .ok_or_else(|| NslError::status(op.c_name(), NslStatus::NotFound))
    }

    fn alloc_handle(&mut self) -> RawHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl SwitchSdk for SimulatedSwitch {
    fn driver_init(&mut self) -> NslResult<()> {
        self.record(SdkCall::DriverInit)?;
        self.initialized = true;
        Ok(())
    }

    fn port_config_get(&mut self, unit: Unit) -> NslResult<PortConfig> {
        self.record(SdkCall::PortConfigGet { unit })?;
        Ok(PortConfig { e: self.ports })
    }

    fn vlan_port_add(
        &mut self,
        unit: Unit,
        vlan: VlanId,
        pbmp: &PortBitmap,
        ubmp: &PortBitmap,
    ) -> NslResult<()> {
        self.record(SdkCall::VlanPortAdd {
            unit,
            vlan,
            pbmp: *pbmp,
            ubmp: *ubmp,
        })?;
        self.vlan_members.insert(vlan, (*pbmp, *ubmp));
        Ok(())
    }

    fn field_group_create(
        &mut self,
        unit: Unit,
        qset: QualifierSet,
        priority: GroupPriority,
    ) -> NslResult<GroupHandle> {
        self.record(SdkCall::FieldGroupCreate {
            unit,
            qset,
            priority,
        })?;
        if qset.is_empty() {
            return Err(NslError::status(
                Operation::FieldGroupCreate.c_name(),
                NslStatus::Param,
            ));
        }
        let group = GroupHandle::from_raw(self.alloc_handle());
        self.groups.push(group);
        Ok(group)
    }

    fn field_entry_create(&mut self, unit: Unit, group: GroupHandle) -> NslResult<EntryHandle> {
        self.record(SdkCall::FieldEntryCreate { unit, group })?;
        if !self.groups.contains(&group) {
            return Err(NslError::status(
                Operation::FieldEntryCreate.c_name(),
                NslStatus::NotFound,
            ));
        }
        let raw = self.alloc_handle();
        self.entries.insert(raw, SimEntry::default());
        Ok(EntryHandle::from_raw(raw))
    }

    fn field_qualify_in_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
        mask: u32,
    ) -> NslResult<()> {
        self.record(SdkCall::FieldQualifyInPort {
            unit,
            entry,
            port,
            mask,
        })?;
        self.entry_mut(Operation::FieldQualifyInPort, entry)?.in_port = Some(port);
        Ok(())
    }

    fn field_action_redirect_port(
        &mut self,
        unit: Unit,
        entry: EntryHandle,
        port: PortId,
    ) -> NslResult<()> {
        self.record(SdkCall::FieldActionRedirectPort { unit, entry, port })?;
        self.entry_mut(Operation::FieldActionAdd, entry)?.redirect = Some(port);
        Ok(())
    }

    fn field_entry_install(&mut self, unit: Unit, entry: EntryHandle) -> NslResult<()> {
        self.record(SdkCall::FieldEntryInstall { unit, entry })?;
        self.entry_mut(Operation::FieldEntryInstall, entry)?.installed = true;
        Ok(())
    }
}
