//! File-backed store.
//!
//! Layout: `<root>/<namespace>/<key>`, one file per value holding the raw
//! bytes.  Writes go to a `.tmp` sibling first and are renamed into place,
//! so a crash mid-write never leaves a half-written record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sk_domain::error::{Error, Result};

use crate::traits::{unavailable, SecureStore};

/// [`SecureStore`] rooted at a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str, namespace: &str) -> Result<PathBuf> {
        check_component("namespace", namespace)?;
        check_component("key", key)?;
        Ok(self.root.join(namespace).join(key))
    }
}

/// Keys and namespaces become path components, so they must not escape the
/// root or collide with temp files.
fn check_component(what: &str, name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with(".tmp")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid store {what} {name:?}")))
    }
}

#[async_trait::async_trait]
impl SecureStore for FileStore {
    async fn get(&self, key: &str, namespace: &str) -> Result<Option<Vec<u8>>> {
        let path = self.value_path(key, namespace)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable("get", key, namespace, e)),
        }
    }

    async fn put(&self, value: &[u8], key: &str, namespace: &str) -> Result<()> {
        let path = self.value_path(key, namespace)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable("put", key, namespace, e))?;
        }

        let tmp_path = path.with_file_name(format!("{key}.tmp"));
        tokio::fs::write(&tmp_path, value)
            .await
            .map_err(|e| unavailable("put", key, namespace, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = tokio::fs::set_permissions(
                &tmp_path,
                std::fs::Permissions::from_mode(0o600),
            )
            .await;
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(unavailable("put", key, namespace, e));
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "store value written");
        Ok(())
    }

    async fn clear(&self, key: &str, namespace: &str) -> Result<()> {
        let path = self.value_path(key, namespace)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable("clear", key, namespace, e)),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
