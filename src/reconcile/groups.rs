use serde::Serialize;

use super::difference;
use crate::rbac::RbacProfileUser;
use crate::report::UserMap;

/// Group membership mismatch for one RBAC profile assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupDiffRecord {
    pub operator_id: String,
    pub profile: String,
    /// Sorted, duplicates removed.
    pub rbac_groups: Vec<String>,
    /// Sorted.
    pub report_groups: Vec<String>,
    pub groups_only_in_rbac: Vec<String>,
    pub groups_only_in_report: Vec<String>,
}

/// Compare group membership for every RBAC row whose operator is in the report.
///
/// Rows for operators missing from the report are skipped; use
/// [`diff_user_sets`](super::diff_user_sets) to find those. Only rows with a
/// difference in at least one direction are returned, in RBAC row order.
/// Comparison is exact and case-sensitive.
pub fn diff_user_groups(report_users: &UserMap, rbac_users: &[RbacProfileUser]) -> Vec<GroupDiffRecord> {
    rbac_users
        .iter()
        .filter_map(|rbac_user| {
            let report_user = report_users.get(&rbac_user.operator_id)?;

            let mut rbac_groups = rbac_user.groups.clone();
            rbac_groups.sort();
            rbac_groups.dedup();
            let report_groups = report_user.sorted_groups();

            let groups_only_in_rbac = difference(&rbac_groups, &report_groups);
            let groups_only_in_report = difference(&report_groups, &rbac_groups);

            if groups_only_in_rbac.is_empty() && groups_only_in_report.is_empty() {
                return None;
            }

            tracing::debug!(
                "Group mismatch for {} ({}): +rbac {:?} +report {:?}",
                rbac_user.operator_id,
                rbac_user.profile,
                groups_only_in_rbac,
                groups_only_in_report
            );

            Some(GroupDiffRecord {
                operator_id: rbac_user.operator_id.clone(),
                profile: rbac_user.profile.clone(),
                rbac_groups,
                report_groups,
                groups_only_in_rbac,
                groups_only_in_report,
            })
        })
        .collect()
}
