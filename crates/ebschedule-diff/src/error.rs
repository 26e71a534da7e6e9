//! Error types for the diff crate.

/// Errors that can occur while editing, normalizing, or diffing documents.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The path is neither empty nor starts with `/`.
    #[error("invalid path {path:?}: must be empty or start with '/'")]
    InvalidPath { path: String },

    /// The path cannot be addressed in the document (e.g. setting through a scalar).
    #[error("cannot address {path:?}: {reason}")]
    Structural { path: String, reason: String },

    /// The value at `path` is not of the type the caller asked for.
    #[error("type mismatch at {path:?}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A record could not be converted into a document.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An error annotated with the operation that produced it.
    #[error("{op}: {source}")]
    Operation {
        op: String,
        #[source]
        source: Box<DiffError>,
    },
}

impl DiffError {
    /// Wrap the error with the name of the failing operation.
    pub fn context(self, op: impl Into<String>) -> Self {
        Self::Operation {
            op: op.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all operation context stripped.
    pub fn root_cause(&self) -> &DiffError {
        match self {
            Self::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_the_message() {
        let err = DiffError::InvalidPath { path: "Arn".into() }.context("remove noise path");
        assert_eq!(
            err.to_string(),
            "remove noise path: invalid path \"Arn\": must be empty or start with '/'"
        );
        assert!(matches!(err.root_cause(), DiffError::InvalidPath { .. }));
    }
}
