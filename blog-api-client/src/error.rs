use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by `blog-client`.
pub enum BlogClientError {
    /// Transport failure (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected token.
    #[error("unauthorized")]
    Unauthorized,

    /// The current user may not perform the operation.
    #[error("forbidden")]
    Forbidden,

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// A resource with the same slug or email already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Malformed request or server-side validation failure.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for `blog-client` operations.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
