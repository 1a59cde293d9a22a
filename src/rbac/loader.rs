//! Loading the per-sheet JSON exports of the RBAC workbook

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

use super::cell::Row;
use super::error::RbacError;
use super::normalize::normalize_key;
use super::record::{RbacProfile, RbacProfileGroups, RbacProfileUser};
use super::sheet::RbacSheet;

/// The typed subset of the workbook the reconciler works with.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RbacData {
    pub profile_users: Vec<RbacProfileUser>,
    pub profiles: Vec<RbacProfile>,
    pub profile_groups: Vec<RbacProfileGroups>,
}

impl RbacData {
    /// Operator ids of every profile assignment, in sheet order.
    pub fn user_ids(&self) -> Vec<&str> {
        self.profile_users.iter().map(|u| u.operator_id.as_str()).collect()
    }
}

/// Normalize the keys of a raw row and flatten newlines inside text cells.
pub fn normalize_row(raw: &Row) -> Row {
    raw.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => Value::String(s.replace('\n', " ")),
                other => other.clone(),
            };
            (normalize_key(k), value)
        })
        .collect()
}

/// Parse the contents of one sheet export.
pub fn parse_sheet(content: &str, path: &Path) -> Result<Vec<Row>, RbacError> {
    let rows: Vec<Row> = serde_json::from_str(content).map_err(|source| RbacError::InvalidSheet {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rows.iter().map(normalize_row).collect())
}

/// Read one sheet. A missing file is `Ok(None)`; the caller decides whether that matters.
pub async fn read_sheet(dir: &Path, sheet: RbacSheet) -> Result<Option<Vec<Row>>, RbacError> {
    let path = dir.join(sheet.file_name());
    if !path.is_file() {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(&path).await?;
    let rows = parse_sheet(&content, &path)?;
    tracing::debug!("Sheet '{}': {} rows", sheet, rows.len());
    Ok(Some(rows))
}

/// Sheets whose export exists in `dir`.
pub fn available_sheets(dir: &Path) -> Vec<RbacSheet> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut sheets: Vec<RbacSheet> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            let sheet = RbacSheet::from_sheet_name(stem);
            if sheet.is_none() {
                tracing::debug!("Ignoring {:?}: not an RBAC sheet export", path);
            }
            sheet
        })
        .collect();
    sheets.sort();
    sheets
}

/// Load the RBAC exports from `dir`.
///
/// `perfil-usuario` is required; `perfiles` and `perfil-grupo` are loaded
/// when present.
pub async fn load_rbac_dir(dir: &Path) -> Result<RbacData, RbacError> {
    tracing::info!("Loading RBAC sheets from {:?}", dir);
    let started = Instant::now();

    let sheet = RbacSheet::ProfileUsers;
    let rows = read_sheet(dir, sheet)
        .await?
        .ok_or_else(|| RbacError::SheetNotFound {
            sheet,
            path: dir.join(sheet.file_name()),
        })?;
    let profile_users = map_rows(&rows, RbacProfileUser::from_row)?;

    let profiles = match read_sheet(dir, RbacSheet::Profiles).await? {
        Some(rows) => map_rows(&rows, RbacProfile::from_row)?,
        None => {
            tracing::warn!("Optional sheet '{}' not found", RbacSheet::Profiles);
            Vec::new()
        }
    };

    let profile_groups = match read_sheet(dir, RbacSheet::ProfileGroups).await? {
        Some(rows) => map_rows(&rows, RbacProfileGroups::from_row)?,
        None => {
            tracing::warn!("Optional sheet '{}' not found", RbacSheet::ProfileGroups);
            Vec::new()
        }
    };

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Loaded {} profile assignments, {} profiles, {} profile group rows",
        profile_users.len(),
        profiles.len(),
        profile_groups.len()
    );

    Ok(RbacData {
        profile_users,
        profiles,
        profile_groups,
    })
}

fn map_rows<T>(
    rows: &[Row],
    from_row: impl Fn(&Row, usize) -> Result<Option<T>, RbacError>,
) -> Result<Vec<T>, RbacError> {
    let mut out = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match from_row(row, index)? {
            Some(record) => out.push(record),
            None => tracing::debug!("Skipping blank row {}", index + 1),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sheet_normalizes_headers() {
        let content = json!([
            {"Usuario OPICS": "JDOE", "Perfil": "TRADER", "Grupos": "FXTRADER\nMMDEALER"}
        ])
        .to_string();
        let rows = parse_sheet(&content, Path::new("perfil-usuario.json")).unwrap();
        assert_eq!(rows[0].get("usuario_opics"), Some(&json!("JDOE")));
        assert_eq!(rows[0].get("grupos"), Some(&json!("FXTRADER MMDEALER")));
    }

    #[test]
    fn test_parse_sheet_rejects_non_array() {
        let result = parse_sheet("{\"perfil\": 1}", Path::new("perfiles.json"));
        assert!(matches!(result, Err(RbacError::InvalidSheet { .. })));
    }

    #[tokio::test]
    async fn test_load_rbac_dir_requires_profile_users() {
        let temp_dir = tempfile::tempdir().unwrap();
        match load_rbac_dir(temp_dir.path()).await {
            Err(RbacError::SheetNotFound { sheet, .. }) => assert_eq!(sheet, RbacSheet::ProfileUsers),
            other => panic!("Expected SheetNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_rbac_dir_skips_blank_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let content = json!([
            {"Usuario OPICS": "JDOE", "Perfil": "TRADER", "Grupos": "G1 G2"},
            {"Usuario OPICS": null, "Perfil": null, "Grupos": null},
            {"Usuario OPICS": "ASMI", "Perfil": "AUDIT", "Grupos": ["AUDITOR"]}
        ]);
        std::fs::write(temp_dir.path().join("perfil-usuario.json"), content.to_string()).unwrap();

        let data = load_rbac_dir(temp_dir.path()).await.unwrap();
        assert_eq!(data.user_ids(), vec!["JDOE", "ASMI"]);
        assert!(data.profiles.is_empty());
        assert_eq!(available_sheets(temp_dir.path()), vec![RbacSheet::ProfileUsers]);
    }

    #[test]
    fn test_available_sheets_by_file_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        for name in ["perfil-usuario.json", "gobierno.json", "grupos.json", "usuarios.json", "perfiles.csv"] {
            std::fs::write(temp_dir.path().join(name), "[]").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("perfil-grupo.json")).unwrap();

        assert_eq!(
            available_sheets(temp_dir.path()),
            vec![RbacSheet::Government, RbacSheet::Groups, RbacSheet::ProfileUsers]
        );
    }

    #[test]
    fn test_available_sheets_missing_dir_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(available_sheets(&temp_dir.path().join("absent")).is_empty());
    }
}
