//! opennsl-snake: patch switch ports together in hardware.
//!
//! Every packet received on a port is redirected out of its partner port by
//! an ingress field-processor rule, turning the switch into a set of L1
//! wires. Chaining ports this way ("snake" cabling) lets one traffic source
//! exercise every port of a box.
//!
//! ```text
//! argv ──> [SnakeConfig] ──> [PortMap] ──> [SnakeDaemon] ──> [SwitchSdk] ──> ASIC
//! ```
//!
//! # Key Components
//!
//! - [`PortMap`]: the port pairing, from `A:B` tokens or the default snake
//! - [`RuleInstaller`]: driver bring-up, base VLAN setup, group and rule programming
//! - [`SnakeDaemon`]: runs the sequence once and idles until cancelled
//! - [`SnakeConfig`]: validated command-line options
//! - [`app`]: the binary's flow, returning exit statuses
//!
//! # Example
//!
//! ```
//! use opennsl_sdk::SimulatedSwitch;
//! use opennsl_snake::{PortMap, SnakeConfig, SnakeDaemon};
//!
//! let config = SnakeConfig { max_ports: 8, ..Default::default() };
//! let map = PortMap::from_pairs(config.max_ports, ["1:2", "3:4"]).unwrap();
//!
//! let mut daemon = SnakeDaemon::new(config, SimulatedSwitch::with_ports(8));
//! let report = daemon.program(&map).unwrap();
//! assert_eq!(report.installed, 4);
//! ```

pub mod app;
pub mod config;
pub mod daemon;
pub mod error;
pub mod installer;
pub mod logging;
pub mod portmap;

pub use config::{print_usage, usage_banner, Cli, SnakeConfig};
pub use daemon::{Phase, SnakeDaemon};
pub use error::{PairSide, RuleFailure, RuleStep, SnakeError, SnakeResult, UsageError};
pub use installer::{InstallReport, RuleInstaller};
pub use logging::init_logging;
pub use portmap::{parse_pair, PortMap, DEFAULT_MAX_PORTS};
