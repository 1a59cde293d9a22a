use std::path::PathBuf;
use thiserror::Error;

use super::sheet::RbacSheet;

/// Errors raised while loading the exported RBAC sheets
#[derive(Debug, Error)]
pub enum RbacError {
    /// A required sheet export is missing
    #[error("RBAC sheet '{sheet}' not found at {}", path.display())]
    SheetNotFound {
        sheet: RbacSheet,
        path: PathBuf,
    },

    /// The export is not a JSON array of row objects
    #[error("Invalid RBAC sheet {}: {source}", path.display())]
    InvalidSheet {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A non-blank row lacks a field the record needs
    #[error("Sheet '{sheet}' row {row}: missing field '{field}'")]
    MissingField {
        sheet: RbacSheet,
        /// 1-based data row, header excluded
        row: usize,
        field: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
