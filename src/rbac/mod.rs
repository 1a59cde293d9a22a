//! RBAC workbook records
//!
//! The workbook itself is exported elsewhere, one JSON array of row objects
//! per sheet. Rows are given normalized keys ([`normalize_key`]) and mapped to
//! typed records here; nothing past this module sees a raw row.

pub mod cell;
mod error;
mod loader;
mod normalize;
mod record;
mod sheet;

pub use error::RbacError;
pub use loader::{available_sheets, load_rbac_dir, normalize_row, parse_sheet, read_sheet, RbacData};
pub use normalize::normalize_key;
pub use record::{RbacProfile, RbacProfileGroups, RbacProfileUser};
pub use sheet::RbacSheet;
