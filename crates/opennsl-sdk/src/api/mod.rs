//! Request and response types for the OpenNSL API families snake uses.
//!
//! # Available API Modules
//!
//! - [`field`]: Field processor qualifier sets and group priorities
//! - [`port`]: Port configuration

pub mod field;
pub mod port;

pub use field::{GroupPriority, Qualifier, QualifierSet, EXACT_MATCH_MASK};
pub use port::PortConfig;
