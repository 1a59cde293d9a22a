use serde::Serialize;

use super::difference;

/// Operator ids present in only one of the two sources, each list sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserSetDiff {
    pub only_in_report: Vec<String>,
    pub only_in_rbac: Vec<String>,
}

impl UserSetDiff {
    pub fn is_empty(&self) -> bool {
        self.only_in_report.is_empty() && self.only_in_rbac.is_empty()
    }
}

/// Two-way set difference of operator ids.
///
/// Duplicates on either side collapse; both outputs are sorted ascending.
///
/// # Examples
///
/// ```
/// use recon::reconcile::diff_user_sets;
///
/// let diff = diff_user_sets(["A", "B", "C"], ["B", "C", "D"]);
/// assert_eq!(diff.only_in_report, vec!["A"]);
/// assert_eq!(diff.only_in_rbac, vec!["D"]);
/// ```
pub fn diff_user_sets<A, B, SA, SB>(report_users: A, rbac_users: B) -> UserSetDiff
where
    A: IntoIterator<Item = SA>,
    B: IntoIterator<Item = SB>,
    SA: AsRef<str>,
    SB: AsRef<str>,
{
    let report: Vec<String> = report_users.into_iter().map(|s| s.as_ref().to_string()).collect();
    let rbac: Vec<String> = rbac_users.into_iter().map(|s| s.as_ref().to_string()).collect();

    UserSetDiff {
        only_in_report: difference(&report, &rbac),
        only_in_rbac: difference(&rbac, &report),
    }
}
