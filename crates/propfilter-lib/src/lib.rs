//! Property filtering library entry points.
//!
//! This crate holds the domain side of the property filter service: the
//! incoming property records, the address concatenation rules, and the
//! asynchronous filtering step that selects completed HTV records. Higher-level
//! consumers (the HTTP service) should only depend on the items exported here
//! instead of reimplementing behavior.

pub mod address;
pub mod error;
pub mod filter;
pub mod property;

pub use address::concat_address;
pub use error::{Error, Result};
pub use filter::{filter_completed_htv, is_completed_htv, FilterStep, StepDecision};
pub use property::{Address, FilteredProperty, PropertyRecord, COMPLETED_WORKFLOW, HTV_TYPE};
