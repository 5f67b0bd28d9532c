//! Command-line parsing and validated run configuration.

use std::io::Write;

use clap::Parser;
use opennsl_sdk::Unit;
use opennsl_types::PBMP_PORT_MAX;

use crate::error::UsageError;
use crate::portmap::{PortMap, DEFAULT_MAX_PORTS};

/// Patch pairs of switch ports together in hardware (L1 snake)
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "opennsl-snake")]
#[command(version, about, long_about = None, disable_help_flag = true)]
pub struct Cli {
    /// Port pairs to patch, e.g. "1:2 3:4". Defaults to every adjacent pair
    #[arg(value_name = "PORT:PORT")]
    pub pairs: Vec<String>,

    /// Size of the port table; valid ports are 1 to N-1
    #[arg(long, default_value_t = DEFAULT_MAX_PORTS)]
    pub max_ports: u16,

    /// Exit if ports cannot be added to the default VLAN
    #[arg(long)]
    pub strict_base_setup: bool,

    /// Program an in-memory switch instead of the OpenNSL driver
    #[arg(long)]
    pub simulate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Print usage
    #[arg(short = 'h', long)]
    pub help: bool,
}

/// Everything a run needs, checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeConfig {
    pub max_ports: u16,
    pub unit: Unit,
    pub strict_base_setup: bool,
    pub simulate: bool,
    pub log_level: String,
    /// Raw `A:B` tokens; empty means the default snake mapping.
    pub pairs: Vec<String>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            max_ports: DEFAULT_MAX_PORTS,
            unit: Unit::DEFAULT,
            strict_base_setup: false,
            simulate: false,
            log_level: "info".to_string(),
            pairs: Vec::new(),
        }
    }
}

impl SnakeConfig {
    /// Builds the port map this run will install.
    pub fn port_map(&self) -> Result<PortMap, UsageError> {
        if self.pairs.is_empty() {
            Ok(PortMap::snake(self.max_ports))
        } else {
            PortMap::from_pairs(self.max_ports, &self.pairs)
        }
    }
}

impl TryFrom<Cli> for SnakeConfig {
    type Error = UsageError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.help {
            return Err(UsageError::HelpRequested);
        }
        let max = cli.max_ports;
        if max < 2 || max % 2 != 0 || usize::from(max) > PBMP_PORT_MAX {
            return Err(UsageError::InvalidOption(format!(
                "--max-ports must be an even number from 2 to {PBMP_PORT_MAX}, got {max}"
            )));
        }
        Ok(Self {
            max_ports: max,
            strict_base_setup: cli.strict_base_setup,
            simulate: cli.simulate,
            log_level: cli.log_level,
            pairs: cli.pairs,
            ..Default::default()
        })
    }
}

/// The fixed usage text.
pub fn usage_banner() -> String {
    format!(
        "Usage: opennsl-snake [p1:p2 [p3:p4 [...]]]\n\
         \x20   Copyright Big Switch Network 2016\n\
         \x20   Setup an Layer1 (forward all packets) connection between pairs of ports\n\
         \x20   Defaults to all ports, e.g., \"1:2 3:4 5:6 ...\"\n\
         \n\
         Options:\n\
         \x20   --max-ports <N>        size of the port table (default {DEFAULT_MAX_PORTS})\n\
         \x20   --strict-base-setup    exit if ports cannot be added to VLAN 1\n\
         \x20   --simulate             program an in-memory switch\n\
         \x20   -l, --log-level <LVL>  log level (default info; RUST_LOG overrides)\n\
         \x20   -V, --version          print version\n\
         \x20   -h, --help             print this text\n"
    )
}

/// Writes `reason` (if any) and the usage banner to stderr.
pub fn print_usage(reason: Option<&UsageError>) {
    let mut stderr = std::io::stderr().lock();
    if let Some(reason) = reason {
        let _ = write!(stderr, "{reason}\n\n");
    }
    let _ = write!(stderr, "{}", usage_banner());
}
