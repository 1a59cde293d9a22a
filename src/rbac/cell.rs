use serde_json::Value;

/// A sheet row after key normalization.
pub type Row = serde_json::Map<String, Value>;

/// Render a cell as text. Blank strings and nulls become `None`.
pub fn cell_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            // Spreadsheet exports turn integer ids into floats ("1234.0").
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(cell_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Read a text field from a row.
pub fn field(row: &Row, key: &str) -> Option<String> {
    row.get(key).and_then(cell_to_string)
}

/// Split a group cell into codes.
///
/// The cell is either a JSON array or free text separated by whitespace,
/// commas or semicolons.
pub fn split_group_cell(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().flat_map(|v| split_group_cell(Some(v))).collect(),
        Some(other) => cell_to_string(other)
            .map(|text| {
                text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// True when every cell of the row is null or blank.
pub fn is_blank(row: &Row) -> bool {
    row.values().all(|v| cell_to_string(v).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&json!(null)), None);
        assert_eq!(cell_to_string(&json!("  ")), None);
        assert_eq!(cell_to_string(&json!(" JDOE ")), Some("JDOE".to_string()));
        assert_eq!(cell_to_string(&json!(1234.0)), Some("1234".to_string()));
        assert_eq!(cell_to_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_to_string(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_split_group_cell_text() {
        assert_eq!(
            split_group_cell(Some(&json!("FXTRADER, MMDEALER;VIEWONLY  AUDIT"))),
            vec!["FXTRADER", "MMDEALER", "VIEWONLY", "AUDIT"]
        );
        assert!(split_group_cell(Some(&json!(null))).is_empty());
        assert!(split_group_cell(None).is_empty());
    }

    #[test]
    fn test_split_group_cell_array() {
        assert_eq!(
            split_group_cell(Some(&json!(["G1", "G2 G3", null]))),
            vec!["G1", "G2", "G3"]
        );
    }

    #[test]
    fn test_is_blank() {
        let row: Row = serde_json::from_value(json!({"perfil": null, "grupos": " "})).unwrap();
        assert!(is_blank(&row));
        let row: Row = serde_json::from_value(json!({"perfil": "P1"})).unwrap();
        assert!(!is_blank(&row));
    }
}
