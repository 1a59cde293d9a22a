use thiserror::Error;

use crate::rbac::RbacError;
use crate::report::ReportError;

/// Any failure of the load-and-reconcile pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Rbac(#[from] RbacError),
}
