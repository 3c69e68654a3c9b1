//! Process-local store.  Used in tests and for throwaway sessions.

use std::collections::HashMap;

use parking_lot::RwLock;

use sk_domain::error::Result;

use crate::traits::SecureStore;

/// In-memory [`SecureStore`].  Values are keyed by `(namespace, key)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all namespaces.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait::async_trait]
impl SecureStore for MemoryStore {
    async fn get(&self, key: &str, namespace: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .get(&(namespace.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn put(&self, value: &[u8], key: &str, namespace: &str) -> Result<()> {
        self.entries
            .write()
            .insert((namespace.to_owned(), key.to_owned()), value.to_vec());
        Ok(())
    }

    async fn clear(&self, key: &str, namespace: &str) -> Result<()> {
        self.entries
            .write()
            .remove(&(namespace.to_owned(), key.to_owned()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
