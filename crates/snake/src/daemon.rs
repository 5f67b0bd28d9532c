//! SnakeDaemon: runs the programming sequence once, then idles.
//!
//! ```text
//! ParseArgs -> InitDriver -> BaseSetup -> CreateGroup -> InstallRules -> Idle -> Stopped
//! ```
//!
//! Rules stay in hardware after the daemon stops.

use std::fmt;

use opennsl_sdk::SwitchSdk;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SnakeConfig;
use crate::error::{SnakeError, SnakeResult};
use crate::installer::{InstallReport, RuleInstaller};
use crate::portmap::PortMap;

/// Where the daemon is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ParseArgs,
    InitDriver,
    BaseSetup,
    CreateGroup,
    InstallRules,
    Idle,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::ParseArgs => "parse-args",
            Phase::InitDriver => "init-driver",
            Phase::BaseSetup => "base-setup",
            Phase::CreateGroup => "create-group",
            Phase::InstallRules => "install-rules",
            Phase::Idle => "idle",
            Phase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

pub struct SnakeDaemon<S: SwitchSdk> {
    config: SnakeConfig,
    sdk: S,
    phase: Phase,
}

impl<S: SwitchSdk> SnakeDaemon<S> {
    pub fn new(config: SnakeConfig, sdk: S) -> Self {
        Self {
            config,
            sdk,
            phase: Phase::ParseArgs,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    fn enter(&mut self, phase: Phase) {
        advance(&mut self.phase, phase);
    }

    /// Brings up the driver and installs `map`.
    ///
    /// Returns once every rule has been attempted. Per-rule failures are in
    /// the report; only driver, group, and (in strict mode) base-setup
    /// failures are errors.
    pub fn program(&mut self, map: &PortMap) -> SnakeResult<InstallReport> {
        let unit = self.config.unit;
        let strict = self.config.strict_base_setup;

        // `installer` holds the SDK borrow from here on.
        self.enter(Phase::InitDriver);
        let mut installer = RuleInstaller::new(&mut self.sdk, unit);
        installer.bring_up()?;

        advance(&mut self.phase, Phase::BaseSetup);
        if let Err(source) = installer.base_setup() {
            if strict {
                return Err(SnakeError::BaseSetup { source });
            }
            warn!(error = %source, "base switch setup failed, continuing");
        }

        advance(&mut self.phase, Phase::CreateGroup);
        let group = installer.create_group()?;

        advance(&mut self.phase, Phase::InstallRules);
        debug!(group = %group, "field group created");
        Ok(installer.install(group, map))
    }

    /// Programs the switch, then waits for `shutdown` to be cancelled.
    pub async fn run(
        &mut self,
        map: &PortMap,
        shutdown: CancellationToken,
    ) -> SnakeResult<InstallReport> {
        let report = self.program(map)?;

        self.enter(Phase::Idle);
        info!("Forwarding packets; hit ^C to stop");
        shutdown.cancelled().await;

        info!(
            "Shutdown requested; leaving {} patch rules installed",
            report.installed
        );
        self.enter(Phase::Stopped);
        Ok(report)
    }
}

fn advance(current: &mut Phase, next: Phase) {
    debug!(from = %current, to = %next, "phase change");
    *current = next;
}
