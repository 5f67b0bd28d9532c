//! Programs the switch: driver bring-up, base VLAN setup, the InPort field
//! group, and one redirect rule per patched port.

use opennsl_sdk::api::{GroupPriority, Qualifier, QualifierSet, EXACT_MATCH_MASK};
use opennsl_sdk::{GroupHandle, NslError, NslResult, SwitchSdk, Unit};
use opennsl_types::{PortId, VlanId};
use tracing::{debug, error, info};

use crate::error::{RuleFailure, RuleStep, SnakeError, SnakeResult};
use crate::portmap::PortMap;

/// Outcome of installing a whole port map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Rules that made it into hardware.
    pub installed: usize,
    /// Rules that did not, in the order they were attempted.
    pub failed: Vec<RuleFailure>,
}

impl InstallReport {
    pub fn attempted(&self) -> usize {
        self.installed + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Issues SDK calls for one chip.
pub struct RuleInstaller<'a, S: SwitchSdk + ?Sized> {
    sdk: &'a mut S,
    unit: Unit,
}

impl<'a, S: SwitchSdk + ?Sized> RuleInstaller<'a, S> {
    pub fn new(sdk: &'a mut S, unit: Unit) -> Self {
        Self { sdk, unit }
    }

    /// Initializes the driver.
    pub fn bring_up(&mut self) -> SnakeResult<()> {
        self.sdk
            .driver_init()
            .map_err(|source| SnakeError::DriverInit { source })
    }

    /// Adds every Ethernet port to the default VLAN, tagged and untagged.
    pub fn base_setup(&mut self) -> NslResult<()> {
        let ports = self.sdk.port_config_get(self.unit).map_err(|e| {
            error!(
                "Failed to get port configuration. Error {}",
                self.sdk.describe_error(e.raw_code())
            );
            e
        })?;

        self.sdk
            .vlan_port_add(self.unit, VlanId::DEFAULT, &ports.e, &ports.e)
            .map_err(|e| {
                error!(
                    "Failed to add ports to VLAN. Error {}",
                    self.sdk.describe_error(e.raw_code())
                );
                e
            })?;

        debug!(
            vlan = %VlanId::DEFAULT,
            ports = ports.e.count(),
            "ports added to default VLAN"
        );
        Ok(())
    }

    /// Creates the field group all patch rules live in.
    pub fn create_group(&mut self) -> SnakeResult<GroupHandle> {
        let qset = QualifierSet::new().add(Qualifier::InPort);
        self.sdk
            .field_group_create(self.unit, qset, GroupPriority::ANY)
            .map_err(|source| SnakeError::GroupCreate { source })
    }

    /// Installs a rule sending everything received on `src` out of `dst`.
    pub fn patch(&mut self, group: GroupHandle, src: PortId, dst: PortId) -> Result<(), RuleFailure> {
        let unit = self.unit;
        let fail = |step: RuleStep| move |error: NslError| RuleFailure { src, dst, step, error };

        let entry = self
            .sdk
            .field_entry_create(unit, group)
            .map_err(fail(RuleStep::CreateEntry))?;
        self.sdk
            .field_qualify_in_port(unit, entry, src, EXACT_MATCH_MASK)
            .map_err(fail(RuleStep::QualifyInPort))?;
        self.sdk
            .field_action_redirect_port(unit, entry, dst)
            .map_err(fail(RuleStep::AddRedirect))?;
        self.sdk
            .field_entry_install(unit, entry)
            .map_err(fail(RuleStep::Install))?;
        Ok(())
    }

    /// Installs a rule for every patched port. A failed rule is logged and
    /// skipped.
    pub fn install(&mut self, group: GroupHandle, map: &PortMap) -> InstallReport {
        let mut report = InstallReport::default();

        for (src, dst) in map.entries() {
            match self.patch(group, src, dst) {
                Ok(()) => {
                    info!("Patching Port {} to Port {}... done.", src, dst);
                    report.installed += 1;
                }
                Err(failure) => {
                    error!(
                        src = %src,
                        dst = %dst,
                        "Patching Port {} to Port {}... {} failed : {}",
                        src,
                        dst,
                        failure.step,
                        self.sdk.describe_error(failure.error.raw_code())
                    );
                    report.failed.push(failure);
                }
            }
        }

        info!(
            installed = report.installed,
            failed = report.failed.len(),
            "Installed {} of {} patch rules",
            report.installed,
            report.attempted()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opennsl_sdk::{NslStatus, Operation, SdkCall, SimulatedSwitch};
    use pretty_assertions::assert_eq;

    fn port(p: u16) -> PortId {
        PortId::new(p).unwrap()
    }

    fn ready(ports: u16) -> SimulatedSwitch {
        let mut sim = SimulatedSwitch::with_ports(ports);
        sim.driver_init().unwrap();
        sim
    }

    #[test]
    fn test_patch_issues_four_steps_in_order() {
        let mut sim = ready(8);
        let mut installer = RuleInstaller::new(&mut sim, Unit::DEFAULT);
        let group = installer.create_group().unwrap();
        installer.patch(group, port(1), port(2)).unwrap();

        let ops: Vec<Operation> = sim.calls().iter().map(SdkCall::operation).collect();
        assert_eq!(
            ops,
            vec![
                Operation::DriverInit,
                Operation::FieldGroupCreate,
                Operation::FieldEntryCreate,
                Operation::FieldQualifyInPort,
                Operation::FieldActionAdd,
                Operation::FieldEntryInstall,
            ]
        );
        assert!(sim.calls().iter().any(|c| matches!(
            c,
            SdkCall::FieldQualifyInPort { mask: EXACT_MATCH_MASK, .. }
        )));
        assert_eq!(sim.installed_rules(), vec![(port(1), port(2))]);
    }

    #[test]
    fn test_group_is_in_port_any_priority() {
        let mut sim = ready(8);
        RuleInstaller::new(&mut sim, Unit::DEFAULT)
            .create_group()
            .unwrap();
        assert_eq!(
            sim.calls()[1],
            SdkCall::FieldGroupCreate {
                unit: Unit::DEFAULT,
                qset: QualifierSet::new().add(Qualifier::InPort),
                priority: GroupPriority::ANY,
            }
        );
    }

    #[test]
    fn test_patch_failure_names_step() {
        let mut sim = ready(8);
        sim.fail_on_port(Operation::FieldActionAdd, port(3), NslStatus::Param);
        let mut installer = RuleInstaller::new(&mut sim, Unit::DEFAULT);
        let group = installer.create_group().unwrap();

        let failure = installer.patch(group, port(3), port(4)).unwrap_err();
        assert_eq!(failure.step, RuleStep::AddRedirect);
        assert_eq!(failure.error.code(), NslStatus::Param);
        assert_eq!(sim.call_count(Operation::FieldEntryInstall), 0);
    }

    #[test]
    fn test_install_continues_past_failures() {
        let mut sim = ready(8);
        sim.fail_on_port(Operation::FieldEntryInstall, port(2), NslStatus::Full);
        let map = PortMap::from_pairs(8, ["1:2", "3:4"]).unwrap();

        let mut installer = RuleInstaller::new(&mut sim, Unit::DEFAULT);
        let group = installer.create_group().unwrap();
        let report = installer.install(group, &map);

        assert_eq!(report.installed, 3);
        assert_eq!(report.attempted(), 4);
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].src, port(2));
        assert_eq!(report.failed[0].step, RuleStep::Install);
        assert_eq!(
            sim.installed_rules(),
            vec![(port(1), port(2)), (port(3), port(4)), (port(4), port(3))]
        );
    }

    #[test]
    fn test_base_setup_adds_ethernet_ports_to_vlan_1() {
        let mut sim = ready(4);
        RuleInstaller::new(&mut sim, Unit::DEFAULT)
            .base_setup()
            .unwrap();
        let (members, untagged) = sim.vlan_members(VlanId::DEFAULT).unwrap();
        assert_eq!(members.count(), 4);
        assert_eq!(members, untagged);
    }

    #[test]
    fn test_base_setup_returns_sdk_error() {
        let mut sim = ready(4);
        sim.fail_on(Operation::PortConfigGet, NslStatus::Unit);
        let err = RuleInstaller::new(&mut sim, Unit::DEFAULT)
            .base_setup()
            .unwrap_err();
        assert_eq!(err.code(), NslStatus::Unit);
        assert_eq!(sim.call_count(Operation::VlanPortAdd), 0);
    }

    #[test]
    fn test_bring_up_failure_is_driver_init() {
        let mut sim = SimulatedSwitch::default();
        sim.fail_on(Operation::DriverInit, NslStatus::Fail);
        let err = RuleInstaller::new(&mut sim, Unit::DEFAULT)
            .bring_up()
            .unwrap_err();
        assert!(matches!(err, SnakeError::DriverInit { .. }));
    }

    #[test]
    fn test_failure_keeps_raw_sdk_code() {
        let mut sim = ready(4);
        sim.fail_on_code(Operation::FieldEntryInstall, -19);
        let map = PortMap::from_pairs(4, ["1:2"]).unwrap();

        let mut installer = RuleInstaller::new(&mut sim, Unit::DEFAULT);
        let group = installer.create_group().unwrap();
        let report = installer.install(group, &map);

        assert_eq!(report.failed.len(), 2);
        let error = &report.failed[0].error;
        assert_eq!(error.raw_code(), -19);
        assert_eq!(sim.describe_error(error.raw_code()), "Unknown error");
    }
}
