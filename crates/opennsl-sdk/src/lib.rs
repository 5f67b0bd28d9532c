//! Safe Rust interface to the OpenNSL switch SDK.
//!
//! This crate wraps the handful of OpenNSL calls needed to program ingress
//! field-processor rules, preventing common errors like mixing group and
//! entry handles and turning `opennsl_error_t` codes into `Result`s.
//!
//! # Architecture
//!
//! - [`types`]: typed handles and the chip [`Unit`]
//! - [`error`]: status codes, `opennsl_errmsg` text and [`NslError`]
//! - [`api`]: request/response types for the field and port API families
//! - [`SwitchSdk`]: the capability trait the rest of the tooling programs against
//! - [`OpenNslDriver`]: the real driver (`opennsl-link` feature)
//! - [`SimulatedSwitch`]: an in-memory switch that records calls
//!
//! # Example
//!
//! ```
//! use opennsl_sdk::api::{GroupPriority, Qualifier, QualifierSet};
//! use opennsl_sdk::{NslResult, SimulatedSwitch, SwitchSdk, Unit};
//!
//! fn in_port_group(sdk: &mut dyn SwitchSdk) -> NslResult<()> {
//!     sdk.driver_init()?;
//!     let qset = QualifierSet::new().add(Qualifier::InPort);
//!     sdk.field_group_create(Unit::DEFAULT, qset, GroupPriority::ANY)?;
//!     Ok(())
//! }
//!
//! let mut sim = SimulatedSwitch::default();
//! in_port_group(&mut sim).unwrap();
//! assert_eq!(sim.groups().len(), 1);
//! ```

pub mod api;
pub mod driver;
pub mod error;
pub mod sdk;
pub mod sim;
pub mod types;

pub use driver::OpenNslDriver;
pub use error::{errmsg, NslError, NslResult, NslStatus, NslStatusExt};
pub use sdk::SwitchSdk;
pub use sim::{Operation, SdkCall, SimulatedSwitch, DEFAULT_SIM_PORTS};
pub use types::{EntryHandle, GroupHandle, Handle, HandleKind, RawHandle, Unit};
