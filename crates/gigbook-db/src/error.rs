//! Error taxonomy for store operations.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field is missing or a supplied value is malformed.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The operation targets an id that does not exist.
    #[error("{entity} with ID {id} was not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A foreign key names a row that does not exist.
    #[error("{entity} ID {id} is invalid")]
    Reference { entity: &'static str, id: Uuid },

    #[error("database error: {0}")]
    Persistence(#[from] DbErr),
}

impl StoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
