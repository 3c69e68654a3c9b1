use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Secure store backend
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which secure store implementation backs the session record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// One file per key at `<path>/<namespace>/<key>` holding the raw value bytes.
    #[default]
    File,
    /// Process-local; lost on exit.
    Memory,
    /// OS keychain (macOS Keychain, Windows Credential Manager, Secret Service).
    Keychain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// State directory for the file backend.
    #[serde(default = "d_path")]
    pub path: PathBuf,

    /// Keychain service prefix; the namespace is appended as `<service>.<namespace>`.
    #[serde(default = "d_service")]
    pub service: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: d_path(),
            service: d_service(),
        }
    }
}

fn d_path() -> PathBuf {
    PathBuf::from("./state")
}
fn d_service() -> String {
    "sessionkeeper".into()
}
