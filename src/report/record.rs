use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Parsed report keyed by operator id.
pub type UserMap = BTreeMap<String, UserRecord>;

/// One operator as listed in the RUGAR report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Fixed-width (4 character) operator id.
    pub operator_id: String,
    pub display_name: String,
    pub groups: BTreeSet<String>,
}

impl UserRecord {
    pub fn new(operator_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            display_name: display_name.into(),
            groups: BTreeSet::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Fold a later occurrence of the same operator into this one.
    ///
    /// Groups are unioned; the name is taken from `other`.
    pub fn merge(&mut self, other: UserRecord) {
        self.display_name = other.display_name;
        self.groups.extend(other.groups);
    }

    /// Group codes in ascending order.
    pub fn sorted_groups(&self) -> Vec<String> {
        self.groups.iter().cloned().collect()
    }
}
