//! RUGAR "Users Group Access Report" parsing
//!
//! The report is a fixed-layout text export listing, per operator, an
//! `OperatorID:` header, an `Operator Name:` field and a block of group codes
//! introduced by the line that carries the `Phone` label.
//!
//! # Examples
//!
//! ```
//! use recon::report::{parse_lines, LineFilter};
//!
//! let lines = [
//!     "Users Group Access Report            Page 1",
//!     "OperatorID: JDOE   Operator Name: John Doe",
//!     "Email: jdoe@bank.test    Phone: 555-1234",
//!     "FXTRADER MMDEALER",
//! ];
//! let users = parse_lines(lines, &LineFilter::default()).unwrap();
//! assert_eq!(users["JDOE"].display_name, "John Doe");
//! assert_eq!(users["JDOE"].sorted_groups(), vec!["FXTRADER", "MMDEALER"]);
//! ```

mod error;
mod line;
pub mod parser;
mod record;
pub mod source;

use std::path::Path;
use std::time::Instant;

pub use error::ReportError;
pub use line::{LineClass, LineFilter};
pub use parser::parse_lines;
pub use record::{UserMap, UserRecord};

/// Read and parse a report file.
///
/// The file is read asynchronously; the parse itself runs on the blocking
/// pool since it does not yield.
pub async fn load_report(path: &Path, filter: LineFilter) -> Result<UserMap, ReportError> {
    let started = Instant::now();
    let lines = source::read_report_lines(path).await?;
    tracing::debug!("Read {} lines from {:?}", lines.len(), path);

    let users = tokio::task::spawn_blocking(move || parse_lines(&lines, &filter))
        .await
        .map_err(|e| ReportError::Task(e.to_string()))??;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Parsed {} operators from {:?}",
        users.len(),
        path
    );
    Ok(users)
}
