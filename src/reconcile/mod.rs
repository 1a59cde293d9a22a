//! Diffing the parsed report against RBAC
//!
//! Every function here is pure: inputs are borrowed, results are built fresh.
//! Identifier and group lists in the results are sorted.

mod groups;
mod users;

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;

pub use groups::{diff_user_groups, GroupDiffRecord};
pub use users::{diff_user_sets, UserSetDiff};

use crate::rbac::RbacProfileUser;
use crate::report::UserMap;

/// Both diffs for one report/RBAC pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub users: UserSetDiff,
    pub groups: Vec<GroupDiffRecord>,
}

impl Reconciliation {
    /// No user or group anomaly was found.
    pub fn is_clean(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

/// Run the user-set and group-membership diffs.
pub fn reconcile(report_users: &UserMap, rbac_users: &[RbacProfileUser]) -> Reconciliation {
    let started = Instant::now();
    let users = diff_user_sets(
        report_users.keys(),
        rbac_users.iter().map(|u| u.operator_id.as_str()),
    );
    let groups = diff_user_groups(report_users, rbac_users);

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Reconciled {} report operators against {} RBAC rows: {} only in report, {} only in RBAC, {} group mismatches",
        report_users.len(),
        rbac_users.len(),
        users.only_in_report.len(),
        users.only_in_rbac.len(),
        groups.len()
    );

    Reconciliation { users, groups }
}

/// Elements of `left` absent from `right`, sorted and deduplicated.
fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();
    left.iter()
        .map(String::as_str)
        .filter(|item| !right.contains(item))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
