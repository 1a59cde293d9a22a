//! Locating and reading `R01RUGAR_<YYYYMMDD>.rpt` files

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::error::ReportError;
use crate::config::{REPORT_FILE_EXTENSION, REPORT_FILE_PREFIX};

const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a report date in `YYYYMMDD` form.
///
/// # Examples
///
/// ```
/// use recon::report::source::parse_report_date;
///
/// let date = parse_report_date("20241030").unwrap();
/// assert_eq!(date.to_string(), "2024-10-30");
/// assert!(parse_report_date("2024-10-30").is_err());
/// ```
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, ReportError> {
    let trimmed = raw.trim();
    if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReportError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ReportError::InvalidDate(raw.to_string()))
}

/// File name the report generator uses for a given day.
pub fn report_file_name(date: NaiveDate) -> String {
    format!(
        "{}{}.{}",
        REPORT_FILE_PREFIX,
        date.format(DATE_FORMAT),
        REPORT_FILE_EXTENSION
    )
}

pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(report_file_name(date))
}

/// Recover the date from a report file name, if it follows the convention.
pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name
        .strip_prefix(REPORT_FILE_PREFIX)?
        .strip_suffix(REPORT_FILE_EXTENSION)?
        .strip_suffix('.')?;
    parse_report_date(stem).ok()
}

/// Newest report in `dir` by the date in its file name.
///
/// Returns `Ok(None)` when the directory holds no well-named report.
pub fn find_latest_report(dir: &Path) -> Result<Option<(NaiveDate, PathBuf)>, ReportError> {
    if !dir.is_dir() {
        return Err(ReportError::NotFound { path: dir.to_path_buf() });
    }

    let mut latest: Option<(NaiveDate, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(date) = name.to_str().and_then(date_from_file_name) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(best, _)| date > *best) {
            latest = Some((date, entry.path()));
        }
    }

    if let Some((date, path)) = &latest {
        tracing::debug!("Latest report in {:?}: {} ({:?})", dir, date, path);
    }
    Ok(latest)
}

/// Read every line of a report file.
///
/// The existence check happens before anything is opened so a missing file
/// is always reported as [`ReportError::NotFound`]. Bytes that are not valid
/// UTF-8 are replaced rather than rejected.
pub async fn read_report_lines(path: &Path) -> Result<Vec<String>, ReportError> {
    if !path.is_file() {
        return Err(ReportError::NotFound { path: path.to_path_buf() });
    }

    tracing::info!("Reading report: {:?}", path);
    let bytes = tokio::fs::read(path).await?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Report {:?} is not valid UTF-8; invalid bytes replaced", path);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(text.lines().map(str::to_string).collect())
}
