use sk_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core store trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Durable key-value storage addressed by `(key, namespace)`.
///
/// Implementations must keep a value until it is cleared and must never
/// return a value written under a different namespace.  Every call may
/// block on I/O, so callers run them off their own execution context.
#[async_trait::async_trait]
pub trait SecureStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when nothing is stored.
    async fn get(&self, key: &str, namespace: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, value: &[u8], key: &str, namespace: &str) -> Result<()>;

    /// Remove the value under `key`.  Clearing an absent key succeeds.
    async fn clear(&self, key: &str, namespace: &str) -> Result<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build a [`Error::StorageUnavailable`] for a failed store call.
pub(crate) fn unavailable(
    operation: &'static str,
    key: &str,
    namespace: &str,
    err: impl std::fmt::Display,
) -> Error {
    Error::StorageUnavailable {
        operation,
        key: key.to_owned(),
        namespace: namespace.to_owned(),
        message: err.to_string(),
    }
}
