use serde::{Deserialize, Serialize};

/// Sheets of the RBAC workbook, as exported one JSON file per sheet.
///
/// Variants are declared in workbook order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RbacSheet {
    /// Governance and ownership of the application.
    Government,
    /// Catalogue of access groups.
    Groups,
    /// Transactions granted by each group.
    GroupTransaction,
    /// Catalogue of profiles.
    Profiles,
    /// Groups bundled into each profile.
    ProfileGroups,
    /// Profile assigned to each user, with the user's groups.
    ProfileUsers,
}

impl RbacSheet {
    /// Sheet name inside the workbook.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            RbacSheet::Government => "gobierno",
            RbacSheet::Groups => "grupos",
            RbacSheet::GroupTransaction => "grupo-transaccion",
            RbacSheet::Profiles => "perfiles",
            RbacSheet::ProfileGroups => "perfil-grupo",
            RbacSheet::ProfileUsers => "perfil-usuario",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.sheet_name())
    }

    /// Sheet for an export file stem such as `perfil-grupo`.
    pub fn from_sheet_name(name: &str) -> Option<RbacSheet> {
        Self::all().iter().copied().find(|s| s.sheet_name() == name)
    }

    /// All sheets, in workbook order.
    pub fn all() -> &'static [RbacSheet] {
        &[
            RbacSheet::Government,
            RbacSheet::Groups,
            RbacSheet::GroupTransaction,
            RbacSheet::Profiles,
            RbacSheet::ProfileGroups,
            RbacSheet::ProfileUsers,
        ]
    }
}

impl std::fmt::Display for RbacSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_name_roundtrip() {
        for sheet in RbacSheet::all() {
            assert_eq!(RbacSheet::from_sheet_name(sheet.sheet_name()), Some(*sheet));
        }
    }

    #[test]
    fn unknown_sheet_returns_none() {
        assert!(RbacSheet::from_sheet_name("usuarios").is_none());
    }

    #[test]
    fn ordering_follows_workbook() {
        let mut sheets = vec![RbacSheet::ProfileUsers, RbacSheet::Government, RbacSheet::Profiles];
        sheets.sort();
        assert_eq!(sheets, vec![RbacSheet::Government, RbacSheet::Profiles, RbacSheet::ProfileUsers]);
    }

    #[test]
    fn file_name_uses_sheet_name() {
        assert_eq!(RbacSheet::ProfileUsers.file_name(), "perfil-usuario.json");
    }
}
