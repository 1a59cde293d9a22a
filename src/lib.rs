//! Reconciliation of RUGAR access reports against the RBAC workbook.
//!
//! The crate is split the same way the pipeline runs:
//!
//! - [`report`] turns the raw `R01RUGAR_<date>.rpt` text into one
//!   [`report::UserRecord`] per operator.
//! - [`rbac`] maps the exported workbook sheets into typed records.
//! - [`reconcile`] diffs the two sources.

pub mod config;
pub mod error;
pub mod rbac;
pub mod reconcile;
pub mod report;

pub use error::Error;
