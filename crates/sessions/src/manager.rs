//! Session config state machine.
//!
//! One record lives under a fixed `(key, namespace)` in the secure store.
//! Reads renew a valid record in memory only; a missing, expired or corrupt
//! record is replaced by a freshly minted one, which is always persisted
//! before it is returned.  Writes are never validated.
//!
//! `current_session_id` always names the session of the last config this
//! manager returned or persisted.

use std::sync::Arc;

use sk_domain::config::SessionSettings;
use sk_domain::error::{Error, Result};
use sk_domain::trace::TraceEvent;
use sk_store::SecureStore;

use crate::logger::{SessionLogger, TracingLogger};
use crate::record::{expiry_from_now, SessionConfig};

pub struct SessionConfigManager {
    store: Arc<dyn SecureStore>,
    logger: Arc<dyn SessionLogger>,
    key: String,
    namespace: String,
    duration_secs: u64,
    current_session_id: String,
}

impl SessionConfigManager {
    /// Build an uninitialized manager.  Nothing touches the store until the
    /// first operation.
    pub fn new(store: Arc<dyn SecureStore>, settings: &SessionSettings) -> Self {
        Self {
            store,
            logger: Arc::new(TracingLogger),
            key: settings.key.clone(),
            namespace: settings.namespace.clone(),
            duration_secs: settings.duration_secs,
            current_session_id: String::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn SessionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Empty until the first config has been loaded or created.
    pub fn current_session_id(&self) -> &str {
        &self.current_session_id
    }

    /// Lifetime in seconds applied to fresh and renewed configs.
    pub fn current_duration(&self) -> u64 {
        self.duration_secs
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Load the current config (or create one) and cache its id.
    pub async fn initialize(&mut self) -> Result<String> {
        let config = self.get_config(false).await?;
        tracing::info!(
            session_id = %config.session_id,
            namespace = %self.namespace,
            "session manager initialized"
        );
        Ok(config.session_id)
    }

    /// Resolve the current session config.
    ///
    /// With `reset`, the stored record is cleared and a new one is created.
    /// Otherwise a valid stored record comes back with its expiry renewed to
    /// `now + duration`; that renewal is NOT written back, callers persist it
    /// with [`save_config`](Self::save_config) when they want it durable.
    /// Missing, expired, corrupt or unreadable records fall back to a fresh
    /// config.  Only a failed write of that fresh config is an error.
    pub async fn get_config(&mut self, reset: bool) -> Result<SessionConfig> {
        if reset {
            let old_session_id = self.current_session_id.clone();
            self.clear_stored().await;
            let fresh = self.create_fresh_config().await?;
            TraceEvent::SessionReset {
                old_session_id,
                new_session_id: fresh.session_id.clone(),
                reason: "reset requested".into(),
            }
            .emit();
            return Ok(fresh);
        }

        match self.read_stored().await {
            Ok(Some(stored)) => {
                let renewed = stored.renewed(self.duration_secs);
                TraceEvent::SessionRenewed {
                    session_id: renewed.session_id.clone(),
                    expiry_date: renewed.expiry_date,
                }
                .emit();
                self.current_session_id = renewed.session_id.clone();
                Ok(renewed)
            }
            Ok(None) => self.create_fresh_config().await,
            Err(e @ Error::ExpiredRecord { .. }) => {
                self.logger.log(&format!("SessionConfigManager: {e}"));
                self.reject(&e);
                self.create_fresh_config().await
            }
            Err(e) => {
                self.logger.error(&format!("SessionConfigManager: {e}"));
                self.reject(&e);
                self.create_fresh_config().await
            }
        }
    }

    /// Write `config` under the fixed key/namespace.  No validation: expired
    /// configs are persisted as given.
    pub async fn save_config(&mut self, config: &SessionConfig) -> Result<()> {
        let bytes = config.encode()?;
        if let Err(e) = self.store.put(&bytes, &self.key, &self.namespace).await {
            self.logger
                .error(&format!("SessionConfigManager: failed to save session: {e}"));
            TraceEvent::StoreOperationFailed {
                operation: "put".into(),
                namespace: self.namespace.clone(),
                error: e.to_string(),
            }
            .emit();
            return Err(Error::StorageWriteFailed {
                key: self.key.clone(),
                namespace: self.namespace.clone(),
                message: e.to_string(),
            });
        }
        self.current_session_id = config.session_id.clone();
        Ok(())
    }

    /// Mint a new session expiring `duration` from now and persist it.
    pub async fn create_fresh_config(&mut self) -> Result<SessionConfig> {
        let config = SessionConfig::fresh(self.duration_secs);
        self.save_config(&config).await?;
        TraceEvent::SessionCreated {
            session_id: config.session_id.clone(),
            expiry_date: config.expiry_date,
        }
        .emit();
        Ok(config)
    }

    /// Change the session lifetime and re-persist the current session with
    /// an expiry computed from the new duration.  The session id is kept
    /// unless the stored record had to be replaced.
    pub async fn update_session_duration(&mut self, duration_secs: u64) -> Result<SessionConfig> {
        if duration_secs == 0 {
            self.logger
                .error("SessionConfigManager: rejected session duration of 0 seconds");
            return Err(Error::Config("session duration must be greater than 0".into()));
        }

        self.logger.log(&format!(
            "SessionConfigManager: session duration set to {:.2} days",
            duration_secs as f64 / 86_400.0
        ));
        self.duration_secs = duration_secs;

        let current = self.get_config(false).await?;
        let updated = SessionConfig::new(current.session_id, expiry_from_now(duration_secs));
        self.save_config(&updated).await?;

        TraceEvent::SessionDurationUpdated {
            session_id: updated.session_id.clone(),
            duration_secs,
        }
        .emit();
        Ok(updated)
    }

    /// Drop the stored session and rotate to a new one.  Anyone holding the
    /// old id is implicitly logged out.
    pub async fn clear_session(&mut self) -> Result<SessionConfig> {
        let old_session_id = self.current_session_id.clone();
        self.clear_stored().await;
        let fresh = self.create_fresh_config().await?;
        TraceEvent::SessionReset {
            old_session_id,
            new_session_id: fresh.session_id.clone(),
            reason: "session cleared".into(),
        }
        .emit();
        Ok(fresh)
    }

    /// Read and validate the stored record.  `Ok(None)` when nothing is stored.
    async fn read_stored(&self) -> Result<Option<SessionConfig>> {
        let Some(raw) = self.store.get(&self.key, &self.namespace).await? else {
            return Ok(None);
        };
        let config = SessionConfig::decode(&raw)?;
        if !config.is_valid() {
            return Err(Error::ExpiredRecord {
                session_id: config.session_id,
                expiry_date: config.expiry_date,
            });
        }
        Ok(Some(config))
    }

    /// Clear the stored record.  A failure is logged only: the fresh record
    /// written next replaces the value anyway.
    async fn clear_stored(&self) {
        if let Err(e) = self.store.clear(&self.key, &self.namespace).await {
            self.logger
                .error(&format!("SessionConfigManager: failed to clear session: {e}"));
            TraceEvent::StoreOperationFailed {
                operation: "clear".into(),
                namespace: self.namespace.clone(),
                error: e.to_string(),
            }
            .emit();
        }
    }

    fn reject(&self, err: &Error) {
        TraceEvent::SessionRecordRejected {
            reason: err.to_string(),
        }
        .emit();
    }
}
