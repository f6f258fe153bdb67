//! Persistence errors

use std::path::PathBuf;

/// Persistence error
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the backing file failed
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value could not be decoded
    #[error("corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// The backend refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl PersistError {
    /// Create I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corruption error
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if retrying the same write may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        let io = PersistError::io("x.json", std::io::Error::other("disk full"));
        assert!(io.is_retryable());
        assert!(!PersistError::corrupt("metricsData", "bad json").is_retryable());
    }

    #[test]
    fn corrupt_display() {
        let err = PersistError::corrupt("metricsData", "expected object");
        assert_eq!(
            err.to_string(),
            "corrupt value under key metricsData: expected object"
        );
    }
}
