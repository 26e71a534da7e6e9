use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{resource} not found: {name}")]
    NotFound { resource: &'static str, name: String },

    #[error("{resource} already exists: {name}")]
    Conflict { resource: &'static str, name: String },

    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Returns `true` when the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
