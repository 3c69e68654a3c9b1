//! End-to-end session lifecycle over the file-backed store.
//!
//! Every test runs the background worker against a fresh temp directory and
//! inspects the raw record on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sk_domain::config::SessionSettings;
use sk_sessions::record::now_millis;
use sk_sessions::{SessionConfig, SessionConfigManager, SessionHandle, SessionService};
use sk_store::{FileStore, SecureStore};

const TOLERANCE_MS: i64 = 5_000;

fn record_path(root: &Path) -> PathBuf {
    root.join("SESSION_CONFIG_FILE").join("SESSION_CONFIG_KEY")
}

fn read_record(root: &Path) -> Option<SessionConfig> {
    let raw = std::fs::read(record_path(root)).ok()?;
    Some(SessionConfig::decode(&raw).unwrap())
}

fn write_raw(root: &Path, bytes: &[u8]) {
    let path = record_path(root);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn spawn(root: &Path, duration_secs: u64) -> SessionHandle {
    let store: Arc<dyn SecureStore> = Arc::new(FileStore::new(root));
    let settings = SessionSettings {
        duration_secs,
        ..Default::default()
    };
    SessionService::spawn(SessionConfigManager::new(store, &settings))
}

fn assert_expires_in(config: &SessionConfig, duration_secs: i64) {
    let delta = config.expiry_date - now_millis() - duration_secs * 1000;
    assert!(delta.abs() < TOLERANCE_MS, "expiry off by {delta}ms");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// First launch & restarts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn first_launch_creates_week_long_session() {
    let dir = tempfile::tempdir().unwrap();
    let handle = spawn(dir.path(), 604_800);

    let config = handle.get_config(false).await.unwrap();
    assert_expires_in(&config, 604_800);

    let on_disk = read_record(dir.path()).unwrap();
    assert_eq!(on_disk.session_id, config.session_id);
    assert_eq!(handle.ready().await.unwrap(), config.session_id);
}

#[tokio::test]
async fn restart_keeps_the_pairing() {
    let dir = tempfile::tempdir().unwrap();
    let first = spawn(dir.path(), 604_800).ready().await.unwrap();
    let second = spawn(dir.path(), 604_800).ready().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn reads_renew_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let stored = SessionConfig::new("paired-dapp", now_millis() + 60_000);
    write_raw(dir.path(), &stored.encode().unwrap());

    let handle = spawn(dir.path(), 604_800);
    let config = handle.get_config(false).await.unwrap();
    assert_eq!(config.session_id, "paired-dapp");
    assert_expires_in(&config, 604_800);
    assert_eq!(read_record(dir.path()), Some(stored));

    handle.save_config(config.clone()).await.unwrap();
    assert_eq!(read_record(dir.path()), Some(config));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fresh-open fallback
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn corrupt_record_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path(), b"{\"sessionId\": 12, \"expiryDate\": ");

    let handle = spawn(dir.path(), 604_800);
    let id = handle.ready().await.unwrap();

    let on_disk = read_record(dir.path()).unwrap();
    assert_eq!(on_disk.session_id, id);
    assert!(on_disk.is_valid());
}

#[tokio::test]
async fn expired_record_gets_a_new_id() {
    let dir = tempfile::tempdir().unwrap();
    let expired = SessionConfig::new("stale", now_millis() - 1_000);
    write_raw(dir.path(), &expired.encode().unwrap());

    let handle = spawn(dir.path(), 604_800);
    let id = handle.ready().await.unwrap();
    assert_ne!(id, "stale");
    assert_eq!(read_record(dir.path()).unwrap().session_id, id);
}

#[tokio::test]
async fn reset_replaces_the_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let handle = spawn(dir.path(), 604_800);
    let old = handle.ready().await.unwrap();

    let fresh = handle.get_config(true).await.unwrap();
    assert_ne!(fresh.session_id, old);
    assert_eq!(read_record(dir.path()), Some(fresh));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Duration & rotation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn shorter_duration_keeps_identity() {
    let dir = tempfile::tempdir().unwrap();
    let handle = spawn(dir.path(), 604_800);
    let id = handle.ready().await.unwrap();

    handle.update_session_duration(3600).await.unwrap();

    let on_disk = read_record(dir.path()).unwrap();
    assert_eq!(on_disk.session_id, id);
    assert_expires_in(&on_disk, 3600);

    let next = handle.create_fresh_config().await.unwrap();
    assert_expires_in(&next, 3600);
}

#[tokio::test]
async fn clear_persists_before_completion_fires() {
    let dir = tempfile::tempdir().unwrap();
    let handle = spawn(dir.path(), 604_800);
    let old = handle.ready().await.unwrap();

    let root = dir.path().to_path_buf();
    let (tx, rx) = tokio::sync::oneshot::channel();
    handle.clear_session_then(move |outcome| {
        let on_disk = read_record(&root);
        let _ = tx.send((outcome, on_disk));
    });

    let (outcome, on_disk) = rx.await.unwrap();
    let new = outcome.unwrap();
    assert_ne!(new, old);
    assert_eq!(on_disk.unwrap().session_id, new);
    assert_eq!(handle.current_session_id(), Some(new));
}

#[tokio::test]
async fn namespaces_hold_independent_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SecureStore> = Arc::new(FileStore::new(dir.path()));

    let wallet = SessionSettings {
        namespace: "wallet_a".into(),
        ..Default::default()
    };
    let other = SessionSettings {
        namespace: "wallet_b".into(),
        ..Default::default()
    };
    let a = SessionService::spawn(SessionConfigManager::new(store.clone(), &wallet));
    let b = SessionService::spawn(SessionConfigManager::new(store, &other));

    let id_a = a.ready().await.unwrap();
    let id_b = b.ready().await.unwrap();
    assert_ne!(id_a, id_b);

    b.clear_session().await.unwrap();
    assert_eq!(a.get_config(false).await.unwrap().session_id, id_a);
}
