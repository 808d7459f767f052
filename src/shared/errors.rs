use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// A status precondition of a transition was not met.
    #[error("{0}")]
    InvalidState(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    /// Store or transport failure. Never shown to API callers verbatim.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let e = DomainError::not_found("Reservation", "abc");
        assert_eq!(e.to_string(), "Reservation not found");
        assert!(matches!(e, DomainError::NotFound { entity: "Reservation", .. }));
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let e: DomainError = sea_orm::DbErr::Custom("disk full".into()).into();
        assert!(matches!(e, DomainError::Storage(_)));
        assert!(e.to_string().contains("disk full"));
    }
}
