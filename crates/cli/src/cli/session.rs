//! Session subcommands: `show`, `reset`, `clear`, `set-duration`.
//!
//! Each command opens the configured store, starts the session worker and
//! waits for it to initialize before issuing its request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sk_domain::config::Config;
use sk_sessions::{SessionConfig, SessionConfigManager, SessionHandle, SessionService};

/// What the CLI prints for a session record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub expiry_date: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<SessionConfig> for SessionView {
    fn from(config: SessionConfig) -> Self {
        Self {
            expires_at: DateTime::from_timestamp_millis(config.expiry_date),
            session_id: config.session_id,
            expiry_date: config.expiry_date,
        }
    }
}

impl SessionView {
    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self)?);
        }
        let expires = self
            .expires_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.expiry_date.to_string());
        Ok(format!("session {}\nexpires {expires}", self.session_id))
    }
}

/// Open the configured store and start a session worker on it.
pub async fn open(config: &Config) -> anyhow::Result<SessionHandle> {
    let store = sk_store::open_store(&config.store)?;
    let manager = SessionConfigManager::new(store, &config.session);
    let handle = SessionService::spawn(manager);
    let session_id = handle.ready().await?;
    tracing::debug!(session_id = %session_id, "session ready");
    Ok(handle)
}

pub async fn show(config: &Config) -> anyhow::Result<SessionView> {
    let handle = open(config).await?;
    Ok(handle.get_config(false).await?.into())
}

pub async fn reset(config: &Config) -> anyhow::Result<SessionView> {
    let handle = open(config).await?;
    Ok(handle.get_config(true).await?.into())
}

pub async fn clear(config: &Config) -> anyhow::Result<String> {
    let handle = open(config).await?;
    Ok(handle.clear_session().await?)
}

pub async fn set_duration(config: &Config, secs: u64) -> anyhow::Result<SessionView> {
    let handle = open(config).await?;
    Ok(handle.update_session_duration(secs).await?.into())
}
