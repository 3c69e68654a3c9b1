use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Logging output
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Log output settings.  The filter itself comes from `RUST_LOG`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Emit one JSON object per log line instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "d_filter")]
    pub default_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            default_filter: d_filter(),
        }
    }
}

fn d_filter() -> String {
    "info".into()
}
