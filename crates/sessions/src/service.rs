//! Background session worker.
//!
//! A [`SessionConfigManager`] is moved onto a single tokio task that drains
//! an mpsc command queue, so every store operation runs off the caller's
//! context and in submission order.  The worker loads (or creates) the
//! session as soon as it starts and publishes the outcome on a watch
//! channel; [`SessionHandle::ready`] resolves with the id, or with the error
//! if that first load-or-create failed.

use tokio::sync::{mpsc, oneshot, watch};

use sk_domain::error::{Error, Result};

use crate::manager::SessionConfigManager;
use crate::record::SessionConfig;

/// Invoked exactly once, after the first successful load-or-create.
pub type InitCallback = Box<dyn FnOnce() + Send + 'static>;

const QUEUE_DEPTH: usize = 32;

enum Command {
    GetConfig {
        reset: bool,
        reply: oneshot::Sender<Result<SessionConfig>>,
    },
    SaveConfig {
        config: SessionConfig,
        reply: oneshot::Sender<Result<()>>,
    },
    CreateFresh {
        reply: oneshot::Sender<Result<SessionConfig>>,
    },
    UpdateDuration {
        duration_secs: u64,
        reply: oneshot::Sender<Result<SessionConfig>>,
    },
    ClearSession {
        reply: oneshot::Sender<Result<SessionConfig>>,
    },
    Duration {
        reply: oneshot::Sender<u64>,
    },
}

/// Outcome of the most recent load-or-create attempt.
#[derive(Debug, Clone)]
enum InitState {
    Pending,
    Ready(String),
    Failed(Error),
}

/// Owns the worker task.  Construct with [`SessionService::spawn`].
pub struct SessionService;

impl SessionService {
    /// Start the worker and return a handle to it.  Must be called inside a
    /// tokio runtime.
    pub fn spawn(manager: SessionConfigManager) -> SessionHandle {
        Self::spawn_inner(manager, None)
    }

    /// Like [`spawn`](Self::spawn), also invoking `on_initialized` once the
    /// first session id is known.
    pub fn spawn_with_callback(
        manager: SessionConfigManager,
        on_initialized: impl FnOnce() + Send + 'static,
    ) -> SessionHandle {
        Self::spawn_inner(manager, Some(Box::new(on_initialized)))
    }

    fn spawn_inner(manager: SessionConfigManager, on_initialized: Option<InitCallback>) -> SessionHandle {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let (init_tx, init_rx) = watch::channel(InitState::Pending);
        let (id_tx, id_rx) = watch::channel(None);

        let worker = Worker {
            manager,
            rx,
            init_tx,
            id_tx,
            on_initialized,
        };
        tokio::spawn(worker.run());

        SessionHandle {
            tx,
            init: init_rx,
            session_id: id_rx,
        }
    }
}

struct Worker {
    manager: SessionConfigManager,
    rx: mpsc::Receiver<Command>,
    init_tx: watch::Sender<InitState>,
    id_tx: watch::Sender<Option<String>>,
    on_initialized: Option<InitCallback>,
}

impl Worker {
    async fn run(mut self) {
        self.initialize().await;

        while let Some(cmd) = self.rx.recv().await {
            if !self.is_initialized() {
                self.initialize().await;
            }
            self.handle(cmd).await;
        }

        tracing::debug!(namespace = %self.manager.namespace(), "session worker stopped");
    }

    fn is_initialized(&self) -> bool {
        matches!(*self.init_tx.borrow(), InitState::Ready(_))
    }

    /// One load-or-create attempt.  Waiters on [`SessionHandle::ready`] see
    /// the outcome either way; the init callback fires on the first success.
    async fn initialize(&mut self) {
        match self.manager.initialize().await {
            Ok(id) => {
                self.id_tx.send_replace(Some(id.clone()));
                self.init_tx.send_replace(InitState::Ready(id));
                if let Some(callback) = self.on_initialized.take() {
                    callback();
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "session initialization failed; retrying on next request");
                self.init_tx.send_replace(InitState::Failed(e));
            }
        }
    }

    /// Run one command.  Watchers see the new id before the caller gets its
    /// reply.  A dropped receiver means the caller stopped waiting; the
    /// operation has still run to completion.
    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::GetConfig { reset, reply } => {
                let result = self.manager.get_config(reset).await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::SaveConfig { config, reply } => {
                let result = self.manager.save_config(&config).await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::CreateFresh { reply } => {
                let result = self.manager.create_fresh_config().await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::UpdateDuration {
                duration_secs,
                reply,
            } => {
                let result = self.manager.update_session_duration(duration_secs).await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::ClearSession { reply } => {
                let result = self.manager.clear_session().await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::Duration { reply } => {
                let _ = reply.send(self.manager.current_duration());
            }
        }
    }

    /// Push the manager's current id to watchers.  Until initialization has
    /// succeeded the id stays unpublished.
    fn publish(&self) {
        if !self.is_initialized() {
            return;
        }
        let id = self.manager.current_session_id();
        if id.is_empty() {
            return;
        }
        self.id_tx.send_if_modified(|current| {
            if current.as_deref() == Some(id) {
                false
            } else {
                *current = Some(id.to_owned());
                true
            }
        });
    }
}

/// Cloneable front end to the session worker.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
    init: watch::Receiver<InitState>,
    session_id: watch::Receiver<Option<String>>,
}

impl SessionHandle {
    /// Wait for the worker's load-or-create attempt and return its id.
    ///
    /// If the attempt failed this returns that error; the worker retries
    /// before its next command, so a later call may succeed.
    pub async fn ready(&self) -> Result<String> {
        let mut rx = self.init.clone();
        let state = rx
            .wait_for(|state| !matches!(state, InitState::Pending))
            .await
            .map_err(|_| Error::ServiceStopped)?;
        match &*state {
            InitState::Ready(id) => Ok(id.clone()),
            InitState::Failed(e) => Err(e.clone()),
            InitState::Pending => Err(Error::ServiceStopped),
        }
    }

    /// The cached session id, or `None` before initialization completes.
    pub fn current_session_id(&self) -> Option<String> {
        self.session_id.borrow().clone()
    }

    /// Subscribe to session id changes (initialization, resets, rotations).
    pub fn watch_session_id(&self) -> watch::Receiver<Option<String>> {
        self.session_id.clone()
    }

    /// See [`SessionConfigManager::get_config`].
    pub async fn get_config(&self, reset: bool) -> Result<SessionConfig> {
        self.request(|reply| Command::GetConfig { reset, reply }).await?
    }

    pub async fn save_config(&self, config: SessionConfig) -> Result<()> {
        self.request(|reply| Command::SaveConfig { config, reply }).await?
    }

    pub async fn create_fresh_config(&self) -> Result<SessionConfig> {
        self.request(|reply| Command::CreateFresh { reply }).await?
    }

    pub async fn update_session_duration(&self, duration_secs: u64) -> Result<SessionConfig> {
        self.request(|reply| Command::UpdateDuration {
            duration_secs,
            reply,
        })
        .await?
    }

    /// Rotate the session.  Resolves with the new id once the new record is
    /// persisted.
    pub async fn clear_session(&self) -> Result<String> {
        let fresh = self.request(|reply| Command::ClearSession { reply }).await??;
        Ok(fresh.session_id)
    }

    /// Queue a rotation and call `on_complete` with its outcome.  Unless the
    /// queue is full, the command is enqueued before this returns, so
    /// operations submitted afterwards observe the rotation.
    pub fn clear_session_then(&self, on_complete: impl FnOnce(Result<String>) + Send + 'static) {
        let (reply, rx) = oneshot::channel();
        match self.tx.try_send(Command::ClearSession { reply }) {
            Ok(()) => {
                tokio::spawn(async move {
                    let outcome = match rx.await {
                        Ok(result) => result.map(|fresh| fresh.session_id),
                        Err(_) => Err(Error::ServiceStopped),
                    };
                    on_complete(outcome);
                });
            }
            Err(mpsc::error::TrySendError::Full(cmd)) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = match tx.send(cmd).await {
                        Ok(()) => match rx.await {
                            Ok(result) => result.map(|fresh| fresh.session_id),
                            Err(_) => Err(Error::ServiceStopped),
                        },
                        Err(_) => Err(Error::ServiceStopped),
                    };
                    on_complete(outcome);
                });
            }
            Err(mpsc::error::TrySendError::Closed(_)) => on_complete(Err(Error::ServiceStopped)),
        }
    }

    /// The session lifetime, in seconds, applied to new and renewed records.
    pub async fn current_duration(&self) -> Result<u64> {
        self.request(|reply| Command::Duration { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| Error::ServiceStopped)?;
        rx.await.map_err(|_| Error::ServiceStopped)
    }
}
