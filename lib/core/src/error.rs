use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No common ravi pattern found between '{first}' and '{second}'")]
    NoCommonSuffix { first: String, second: String },

    #[error("No matching words found for pattern '{0}'")]
    NoMatches(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap any collaborator failure as an internal error, keeping its message.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Error::Internal(err.to_string())
    }

    /// Collapse a collaborator's error into [`Error::Internal`] without double-wrapping.
    pub fn into_internal(self) -> Self {
        match self {
            Error::Internal(_) => self,
            other => Error::Internal(other.to_string()),
        }
    }

    /// True for errors caused by the request itself rather than by a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::NoCommonSuffix { .. } | Error::NoMatches(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidInput("query".into()).is_client_error());
        assert!(Error::NoCommonSuffix { first: "cat".into(), second: "dog".into() }.is_client_error());
        assert!(Error::NoMatches("anged".into()).is_client_error());
        assert!(!Error::internal("store unreachable").is_client_error());
        assert!(!Error::Storage("lmdb".into()).is_client_error());
    }

    #[test]
    fn test_internal_keeps_message() {
        let err = Error::internal("connection refused");
        assert_eq!(err.to_string(), "Internal error: connection refused");
        assert_eq!(err.into_internal().to_string(), "Internal error: connection refused");

        let wrapped = Error::Storage("lmdb closed".into()).into_internal();
        assert!(matches!(wrapped, Error::Internal(ref m) if m == "Storage error: lmdb closed"));
    }
}
