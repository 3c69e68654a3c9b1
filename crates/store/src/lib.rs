//! Secure key-value storage for the session record.
//!
//! Every backend implements [`SecureStore`]: opaque bytes addressed by a
//! `(key, namespace)` pair, with get / put / clear.  Namespaces never leak
//! into each other and a value persists until it is cleared.

pub mod file;
#[cfg(feature = "keychain")]
pub mod keychain;
pub mod memory;
pub mod traits;

use std::sync::Arc;

use sk_domain::config::{StoreBackend, StoreConfig};
use sk_domain::error::Result;

pub use file::FileStore;
#[cfg(feature = "keychain")]
pub use keychain::KeychainStore;
pub use memory::MemoryStore;
pub use traits::SecureStore;

/// Build the store selected by `config.backend`.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn SecureStore>> {
    let store: Arc<dyn SecureStore> = match config.backend {
        StoreBackend::File => Arc::new(FileStore::new(&config.path)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        #[cfg(feature = "keychain")]
        StoreBackend::Keychain => Arc::new(KeychainStore::new(config.service.clone())),
        #[cfg(not(feature = "keychain"))]
        StoreBackend::Keychain => {
            return Err(sk_domain::error::Error::Config(
                "keychain backend requested but sk-store was built without the \
                 `keychain` feature"
                    .into(),
            ));
        }
    };

    tracing::info!(backend = store.name(), "secure store opened");
    Ok(store)
}
