use serde::Serialize;

/// Structured trace events emitted across all SessionKeeper crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionCreated {
        session_id: String,
        expiry_date: i64,
    },
    SessionRenewed {
        session_id: String,
        expiry_date: i64,
    },
    SessionReset {
        old_session_id: String,
        new_session_id: String,
        reason: String,
    },
    SessionDurationUpdated {
        session_id: String,
        duration_secs: u64,
    },
    SessionRecordRejected {
        reason: String,
    },
    StoreOperationFailed {
        operation: String,
        namespace: String,
        error: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "sk_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let ev = TraceEvent::SessionDurationUpdated {
            session_id: "abc".into(),
            duration_secs: 3600,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "SessionDurationUpdated");
        assert_eq!(json["duration_secs"], 3600);
    }
}
