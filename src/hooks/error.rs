use thiserror::Error;

use super::FormError;
use crate::db::DbError;

#[derive(Debug, Error)]
pub enum HookError {
    /// The form carries validation or policy errors.
    #[error("Form rejected: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Rejected(Vec<FormError>),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type HookResult<T> = Result<T, HookError>;
