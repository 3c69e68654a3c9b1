use std::sync::Arc;

/// Shared error type used across all SessionKeeper crates.
///
/// `Clone` so one failure can be handed to every caller waiting on it.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A get/put/clear failed at the secure store boundary.
    #[error("storage unavailable ({operation} {namespace}/{key}): {message}")]
    StorageUnavailable {
        operation: &'static str,
        key: String,
        namespace: String,
        message: String,
    },

    /// Persisting a session record failed.  Recoverable: the caller may retry.
    #[error("storage write failed ({namespace}/{key}): {message}")]
    StorageWriteFailed {
        key: String,
        namespace: String,
        message: String,
    },

    /// Stored bytes do not decode into a session record.
    #[error("malformed session record: {0}")]
    MalformedRecord(String),

    /// The record decoded but its expiry is in the past.
    #[error("session record {session_id} expired at {expiry_date}")]
    ExpiredRecord { session_id: String, expiry_date: i64 },

    /// The session service worker is gone.
    #[error("session service stopped")]
    ServiceStopped,

    #[error("JSON: {0}")]
    Json(#[source] Arc<serde_json::Error>),

    #[error("config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

impl Error {
    /// Whether retrying the same operation may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::StorageWriteFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_are_recoverable() {
        let err = Error::StorageWriteFailed {
            key: "k".into(),
            namespace: "ns".into(),
            message: "disk full".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "storage write failed (ns/k): disk full");
    }

    #[test]
    fn record_errors_are_not_recoverable() {
        assert!(!Error::MalformedRecord("eof".into()).is_recoverable());
        assert!(!Error::ExpiredRecord {
            session_id: "s".into(),
            expiry_date: 0,
        }
        .is_recoverable());
    }

    #[test]
    fn json_errors_keep_their_source() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        let cloned = err.clone();
        assert!(std::error::Error::source(&cloned).is_some());
        assert!(!cloned.is_recoverable());
    }
}
