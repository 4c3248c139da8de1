use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable or otherwise unable to accept the request.
    /// The only class the fallback chain recovers from.
    #[error("backend unreachable: {0}")]
    Unavailable(String),
    #[error("entry not found")]
    NotFound,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("json error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}
