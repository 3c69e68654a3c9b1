//! OS keychain store via the `keyring` crate.
//!
//! Wraps platform-native credential stores (macOS Keychain, Windows
//! Credential Manager, Linux Secret Service / D-Bus).  The keychain
//! service is `<service>.<namespace>` and the account is the key.  All
//! keyring calls are synchronous and go through `spawn_blocking`.

use sk_domain::error::Result;

use crate::traits::{unavailable, SecureStore};

#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn service_for(&self, namespace: &str) -> String {
        format!("{}.{}", self.service, namespace)
    }

    async fn run<T, F>(&self, operation: &'static str, key: &str, namespace: &str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(keyring::Entry) -> std::result::Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service_for(namespace);
        let account = key.to_owned();
        let joined = tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &account)?;
            f(entry)
        })
        .await
        .map_err(|e| unavailable(operation, key, namespace, e))?;
        joined.map_err(|e| unavailable(operation, key, namespace, e))
    }
}

#[async_trait::async_trait]
impl SecureStore for KeychainStore {
    async fn get(&self, key: &str, namespace: &str) -> Result<Option<Vec<u8>>> {
        self.run("get", key, namespace, |entry| match entry.get_secret() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn put(&self, value: &[u8], key: &str, namespace: &str) -> Result<()> {
        let value = value.to_vec();
        self.run("put", key, namespace, move |entry| entry.set_secret(&value))
            .await
    }

    async fn clear(&self, key: &str, namespace: &str) -> Result<()> {
        self.run("clear", key, namespace, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }

    fn name(&self) -> &'static str {
        "keychain"
    }
}
