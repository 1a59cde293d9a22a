//! RUGAR text to [`UserRecord`]s
//!
//! The parse is a straight pipeline with no state outside the call:
//! lines are classified and flattened into one string, the string is split
//! into operator blocks, each block becomes a record, and records are folded
//! into a map keyed by operator id.

use super::error::ReportError;
use super::line::{LineClass, LineFilter, GROUPS_MARKER};
use super::record::{UserMap, UserRecord};

/// Starts every operator block.
pub const OPERATOR_ID_MARKER: &str = "OperatorID: ";

/// Precedes the operator's display name.
pub const OPERATOR_NAME_MARKER: &str = "Operator Name: ";

/// Width of the operator id at the start of a block.
pub const OPERATOR_ID_WIDTH: usize = 4;

/// Classify every line and join the survivors into a single string.
///
/// Each kept line contributes its text plus one space. Newlines and form
/// feeds left inside the text are turned into spaces.
pub fn flatten<I, S>(lines: I, filter: &LineFilter) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flat = String::new();
    for line in lines {
        if let LineClass::Keep(text) = filter.classify(line.as_ref()) {
            flat.push_str(&text);
            flat.push(' ');
        }
    }
    flat.replace(['\n', '\x0c'], " ")
}

/// Split the flattened report into operator blocks, dropping the preamble.
pub fn split_blocks(flat: &str) -> impl Iterator<Item = &str> {
    flat.split(OPERATOR_ID_MARKER).skip(1)
}

/// Pull id, name and groups out of a single operator block.
///
/// `index` is only used for error reporting.
///
/// # Examples
///
/// ```
/// use recon::report::parser::extract_record;
///
/// let rec = extract_record("ABCDOperator Name: Jane Doe Groups:GRP1 GRP2 ", 0).unwrap();
/// assert_eq!(rec.operator_id, "ABCD");
/// assert_eq!(rec.display_name, "Jane Doe");
/// assert_eq!(rec.sorted_groups(), vec!["GRP1", "GRP2"]);
/// ```
pub fn extract_record(block: &str, index: usize) -> Result<UserRecord, ReportError> {
    let operator_id: String = block.chars().take(OPERATOR_ID_WIDTH).collect();
    let malformed = |reason: &str| ReportError::MalformedRecord {
        index,
        operator_id: operator_id.trim().to_string(),
        reason: reason.to_string(),
    };

    if operator_id.chars().count() < OPERATOR_ID_WIDTH || operator_id.trim().is_empty() {
        return Err(malformed("operator id is shorter than 4 characters"));
    }

    let (_, after_name) = block
        .split_once(OPERATOR_NAME_MARKER)
        .ok_or_else(|| malformed("missing 'Operator Name: ' marker"))?;
    let (name, _) = after_name
        .split_once(GROUPS_MARKER)
        .ok_or_else(|| malformed("missing 'Groups:' marker after the operator name"))?;

    // Any repeated groups header within the block belongs to the same list.
    let groups_text = block
        .split(GROUPS_MARKER)
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(UserRecord::new(operator_id, name.trim()).with_groups(split_groups(&groups_text)))
}

/// Split a groups section into codes. Runs of spaces never yield empty codes.
pub fn split_groups(text: &str) -> impl Iterator<Item = &str> {
    text.trim().split(' ').filter(|g| !g.is_empty())
}

/// Parse the raw lines of a RUGAR report.
///
/// A report without any operator block is a valid, empty result. The first
/// malformed block aborts the whole parse.
pub fn parse_lines<I, S>(lines: I, filter: &LineFilter) -> Result<UserMap, ReportError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flat = flatten(lines, filter);

    let users = split_blocks(&flat)
        .enumerate()
        .try_fold(UserMap::new(), |mut users, (index, block)| {
            let record = extract_record(block, index)?;
            match users.get_mut(&record.operator_id) {
                Some(existing) => {
                    tracing::debug!("Merging repeated operator {}", record.operator_id);
                    existing.merge(record);
                }
                None => {
                    users.insert(record.operator_id.clone(), record);
                }
            }
            Ok::<_, ReportError>(users)
        })?;

    if users.is_empty() {
        tracing::warn!("Report contains no '{}' blocks", OPERATOR_ID_MARKER.trim());
    } else {
        tracing::debug!("Parsed {} operators", users.len());
    }

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_record_basic() {
        let rec = extract_record("ABCDOperator Name: Jane Doe Groups:GRP1 GRP2 ", 0).unwrap();
        assert_eq!(rec.operator_id, "ABCD");
        assert_eq!(rec.display_name, "Jane Doe");
        assert_eq!(rec.sorted_groups(), vec!["GRP1", "GRP2"]);
    }

    #[test]
    fn test_extract_record_empty_groups() {
        let rec = extract_record("ABCD    Operator Name: Jane Doe Groups:   ", 3).unwrap();
        assert!(rec.groups.is_empty());
    }

    #[test]
    fn test_extract_record_skips_blank_tokens() {
        let rec = extract_record("ABCD Operator Name: J Groups: G1   G2  ", 0).unwrap();
        assert_eq!(rec.sorted_groups(), vec!["G1", "G2"]);
    }

    #[test]
    fn test_extract_record_repeated_groups_header() {
        let rec = extract_record("ABCD Operator Name: J Groups: G1 Groups: G2 ", 0).unwrap();
        assert_eq!(rec.sorted_groups(), vec!["G1", "G2"]);
    }

    #[test]
    fn test_extract_record_missing_name_marker() {
        let err = extract_record("ABCD Name: Jane Groups: G1", 7).unwrap_err();
        match err {
            ReportError::MalformedRecord { index, operator_id, .. } => {
                assert_eq!(index, 7);
                assert_eq!(operator_id, "ABCD");
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_record_missing_groups_marker() {
        let err = extract_record("ABCD Operator Name: Jane Doe ", 0).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRecord { .. }));
    }

    #[test]
    fn test_extract_record_short_id() {
        let err = extract_record("AB", 0).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRecord { .. }));
    }

    #[test]
    fn test_flatten_appends_space_and_replaces_control_chars() {
        let filter = LineFilter::default();
        let flat = flatten(["OperatorID: ABCD", "Department: X", "a\x0cb"], &filter);
        assert_eq!(flat, "OperatorID: ABCD a b ");
    }

    #[test]
    fn test_split_blocks_drops_preamble() {
        let blocks: Vec<&str> = split_blocks("header OperatorID: AAAA x OperatorID: BBBB y").collect();
        assert_eq!(blocks, vec!["AAAA x ", "BBBB y"]);
    }

    #[test]
    fn test_parse_lines_without_blocks_is_empty() {
        let users = parse_lines(["just a preamble", ""], &LineFilter::default()).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_parse_lines_merges_repeated_operator() {
        let lines = [
            "OperatorID: JDOE  Operator Name: John Doe",
            "Phone: 1",
            "A B",
            "OperatorID: JDOE  Operator Name: John Doe",
            "Phone: 1",
            "B C",
        ];
        let users = parse_lines(lines, &LineFilter::default()).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users["JDOE"].sorted_groups(), vec!["A", "B", "C"]);
    }
}
