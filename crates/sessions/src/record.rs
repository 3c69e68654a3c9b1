//! The persisted session record.
//!
//! Stored as a JSON object with exactly two fields:
//!
//! ```json
//! {"sessionId":"6f1c…","expiryDate":1767225600000}
//! ```
//!
//! `expiryDate` is epoch milliseconds.  `expiresAt` is accepted on read.

use serde::{Deserialize, Serialize};

use sk_domain::error::{Error, Result};

/// A session identifier paired with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub session_id: String,
    #[serde(alias = "expiresAt")]
    pub expiry_date: i64,
}

impl SessionConfig {
    pub fn new(session_id: impl Into<String>, expiry_date: i64) -> Self {
        Self {
            session_id: session_id.into(),
            expiry_date,
        }
    }

    /// A config with a newly minted id expiring `duration_secs` from now.
    pub fn fresh(duration_secs: u64) -> Self {
        Self::new(new_session_id(), expiry_from_now(duration_secs))
    }

    /// Same id, expiry pushed to `duration_secs` from now.
    pub fn renewed(&self, duration_secs: u64) -> Self {
        Self::new(self.session_id.clone(), expiry_from_now(duration_secs))
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_millis())
    }

    /// A record is valid while it has an id and `now_ms` is before its expiry.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.session_id.is_empty() && self.expiry_date > now_ms
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored blob.  Anything that is not a two-field record with a
    /// non-empty id is [`Error::MalformedRecord`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            serde_json::from_slice(bytes).map_err(|e| Error::MalformedRecord(e.to_string()))?;
        if config.session_id.is_empty() {
            return Err(Error::MalformedRecord("empty sessionId".into()));
        }
        Ok(config)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Epoch milliseconds `duration_secs` from now, saturating on overflow.
pub fn expiry_from_now(duration_secs: u64) -> i64 {
    let millis = i64::try_from(duration_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    now_millis().saturating_add(millis)
}

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
