mod observability;
mod session;
mod store;

pub use observability::*;
pub use session::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

/// Durations below this many seconds are accepted but flagged.
const SHORT_DURATION_SECS: u64 = 60;

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.session.duration_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.duration_secs".into(),
                message: "duration must be greater than 0".into(),
            });
        } else if self.session.duration_secs < SHORT_DURATION_SECS {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "session.duration_secs".into(),
                message: format!(
                    "sessions expire after {}s; pairings will rotate almost every launch",
                    self.session.duration_secs
                ),
            });
        }

        if self.session.key.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.key".into(),
                message: "storage key must not be empty".into(),
            });
        }

        if self.session.namespace.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.namespace".into(),
                message: "storage namespace must not be empty".into(),
            });
        }

        match self.store.backend {
            StoreBackend::File if self.store.path.as_os_str().is_empty() => {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "store.path".into(),
                    message: "file backend requires a state directory".into(),
                });
            }
            StoreBackend::Keychain if self.store.service.is_empty() => {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "store.service".into(),
                    message: "keychain backend requires a service name".into(),
                });
            }
            StoreBackend::Memory => {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Warning,
                    field: "store.backend".into(),
                    message: "memory backend does not survive restarts".into(),
                });
            }
            _ => {}
        }

        errors
    }
}
