use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource conflict: {0}")]
    Conflict(String),

    #[error("forbidden")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// `NotFound` for an entity addressed by id, e.g. `post id: 7`.
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} id: {id}"))
    }

    pub(crate) fn is_client_error(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }
}
