use serde::{Deserialize, Serialize};

use super::cell::{field, split_group_cell, Row};
use super::error::RbacError;
use super::sheet::RbacSheet;

// Normalized column keys
pub const KEY_OPERATOR_ID: &str = "usuario_opics";
pub const KEY_USER_NAME: &str = "nombre_del_usuario";
pub const KEY_PROFILE: &str = "perfil";
pub const KEY_GROUPS: &str = "grupos";
pub const KEY_DESCRIPTION: &str = "descripcion_del_perfil";
pub const KEY_ROLE_TYPE: &str = "tipo_role_admin/operativo";
pub const KEY_USER_TYPE: &str = "tipo_de_usuariointerno/externo";
pub const KEY_CRITICALITY: &str = "criticidad_del_privilegio";
pub const KEY_IN_USE: &str = "en_uso";
pub const KEY_WITHDRAWAL_DATE: &str = "fecha__retiro";
pub const KEY_EXCLUSIVE_OF: &str = "excluyente_de_otro_perfil";

/// A row of `perfil-usuario`: the profile and groups RBAC assigns to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacProfileUser {
    pub operator_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub profile: String,
    /// Group codes as recorded on the row, in sheet order.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl RbacProfileUser {
    pub fn new<I, S>(operator_id: impl Into<String>, profile: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operator_id: operator_id.into(),
            user_name: None,
            profile: profile.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Map a normalized row. Blank rows yield `Ok(None)`.
    pub fn from_row(row: &Row, index: usize) -> Result<Option<Self>, RbacError> {
        if super::cell::is_blank(row) {
            return Ok(None);
        }
        let sheet = RbacSheet::ProfileUsers;
        Ok(Some(Self {
            operator_id: required(row, KEY_OPERATOR_ID, sheet, index)?,
            user_name: field(row, KEY_USER_NAME),
            profile: required(row, KEY_PROFILE, sheet, index)?,
            groups: split_group_cell(row.get(KEY_GROUPS)),
        }))
    }
}

/// A row of `perfiles`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacProfile {
    pub profile: String,
    pub description: Option<String>,
    pub role_type: Option<String>,
    pub user_type: Option<String>,
    pub criticality: Option<String>,
    pub in_use: Option<String>,
    pub withdrawal_date: Option<String>,
    pub exclusive_of_another_profile: Option<String>,
}

impl RbacProfile {
    pub fn from_row(row: &Row, index: usize) -> Result<Option<Self>, RbacError> {
        if super::cell::is_blank(row) {
            return Ok(None);
        }
        Ok(Some(Self {
            profile: required(row, KEY_PROFILE, RbacSheet::Profiles, index)?,
            description: field(row, KEY_DESCRIPTION),
            role_type: field(row, KEY_ROLE_TYPE),
            user_type: field(row, KEY_USER_TYPE),
            criticality: field(row, KEY_CRITICALITY),
            in_use: field(row, KEY_IN_USE),
            withdrawal_date: field(row, KEY_WITHDRAWAL_DATE),
            exclusive_of_another_profile: field(row, KEY_EXCLUSIVE_OF),
        }))
    }
}

/// A row of `perfil-grupo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacProfileGroups {
    pub profile: String,
    pub groups: Vec<String>,
}

impl RbacProfileGroups {
    pub fn from_row(row: &Row, index: usize) -> Result<Option<Self>, RbacError> {
        if super::cell::is_blank(row) {
            return Ok(None);
        }
        Ok(Some(Self {
            profile: required(row, KEY_PROFILE, RbacSheet::ProfileGroups, index)?,
            groups: split_group_cell(row.get(KEY_GROUPS)),
        }))
    }
}

fn required(row: &Row, key: &'static str, sheet: RbacSheet, index: usize) -> Result<String, RbacError> {
    field(row, key).ok_or(RbacError::MissingField {
        sheet,
        row: index + 1,
        field: key,
    })
}
