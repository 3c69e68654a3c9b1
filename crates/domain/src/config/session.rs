use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session lifetime & record location
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Seven days.
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 7 * 24 * 3600;

/// Key the session record is stored under.
pub const DEFAULT_SESSION_KEY: &str = "SESSION_CONFIG_KEY";

/// Namespace (storage partition) holding the session record.
pub const DEFAULT_SESSION_NAMESPACE: &str = "SESSION_CONFIG_FILE";

/// Session lifetime and the fixed location of the persisted record.
///
/// `key` and `namespace` must stay stable across restarts, otherwise every
/// launch starts a new pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Lifetime assigned to newly created or renewed sessions.
    #[serde(default = "d_duration")]
    pub duration_secs: u64,

    #[serde(default = "d_key")]
    pub key: String,

    #[serde(default = "d_namespace")]
    pub namespace: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: d_duration(),
            key: d_key(),
            namespace: d_namespace(),
        }
    }
}

fn d_duration() -> u64 {
    DEFAULT_SESSION_DURATION_SECS
}
fn d_key() -> String {
    DEFAULT_SESSION_KEY.into()
}
fn d_namespace() -> String {
    DEFAULT_SESSION_NAMESPACE.into()
}
