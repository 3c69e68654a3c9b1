//! Session lifecycle for SessionKeeper.
//!
//! Keeps one persisted session identifier per storage namespace: minted on
//! first use, renewed on every valid read, rotated when the stored record is
//! missing, expired or corrupt, and on explicit reset.  All store access is
//! serialized through a single background worker.

pub mod logger;
pub mod manager;
pub mod record;
pub mod service;

pub use logger::{SessionLogger, TracingLogger};
pub use manager::SessionConfigManager;
pub use record::SessionConfig;
pub use service::{SessionHandle, SessionService};
