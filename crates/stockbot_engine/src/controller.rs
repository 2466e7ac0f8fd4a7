use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use stockbot_core::{LogLevel, StockEntry};
use stockbot_logging::{bot_debug, bot_info};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::machine::RunMachine;
use crate::publisher::{LogPublisher, LogSubscription};
use crate::settings::RunSettings;
use crate::types::{RunId, RunStatus, StartRejected};

const ALREADY_RUNNING: &str = "Bot is already running.";
const NOTHING_TO_ABORT: &str = "No bot run is currently active.";
const ABORT_SENT: &str = "Abort signal sent.";
const ABORTED_BETWEEN_ROWS: &str = "Run aborted by user.";
const ABORTED_MID_ROW: &str = "Run aborted during process.";
const COMPLETED: &str = "Run completed successfully.";

struct ActiveRun {
    id: RunId,
    cancel: CancellationToken,
}

/// Guarded by one lock so that abort and the run's checkpoints never interleave
/// their log entries.
#[derive(Default)]
struct Shared {
    next_id: u64,
    active: Option<ActiveRun>,
}

/// Owns the single-run invariant and the cancellation token of the active run.
///
/// `start` spawns the run on the ambient tokio runtime, so it must be called
/// from within one.
#[derive(Clone)]
pub struct RunController {
    settings: RunSettings,
    publisher: LogPublisher,
    shared: Arc<Mutex<Shared>>,
}

impl RunController {
    pub fn new(settings: RunSettings, publisher: LogPublisher) -> Self {
        Self {
            settings,
            publisher,
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    pub fn publisher(&self) -> &LogPublisher {
        &self.publisher
    }

    pub fn subscribe(&self) -> LogSubscription {
        self.publisher.subscribe()
    }

    /// Start a run over `rows`. Rows are assumed validated by the caller.
    ///
    /// While another run is active the request is rejected, not queued: one
    /// error entry is published and the active run is left alone.
    pub fn start(&self, rows: Vec<StockEntry>) -> Result<RunHandle, StartRejected> {
        let mut shared = self.lock();
        if let Some(active) = &shared.active {
            self.publisher.emit(ALREADY_RUNNING, LogLevel::Error);
            return Err(StartRejected::AlreadyRunning { active: active.id });
        }

        shared.next_id += 1;
        let id = RunId(shared.next_id);
        let cancel = CancellationToken::new();
        shared.active = Some(ActiveRun {
            id,
            cancel: cancel.clone(),
        });
        drop(shared);

        bot_info!("{} started with {} row(s)", id, rows.len());
        let (status_tx, status_rx) = watch::channel(RunStatus::Running);
        let task = RunTask {
            id,
            machine: RunMachine::new(rows, self.settings.clone()),
            cancel,
            publisher: self.publisher.clone(),
            shared: Arc::clone(&self.shared),
            status_tx,
        };
        tokio::spawn(task.run());

        Ok(RunHandle {
            id,
            status: status_rx,
        })
    }

    /// Request cancellation of `handle`'s run. Takes effect at its next checkpoint.
    pub fn abort(&self, handle: &RunHandle) {
        self.abort_where(|active| active.id == handle.id);
    }

    /// Request cancellation of whatever run is active.
    pub fn abort_active(&self) {
        self.abort_where(|_| true);
    }

    fn abort_where(&self, predicate: impl FnOnce(&ActiveRun) -> bool) {
        let shared = self.lock();
        match shared.active.as_ref().filter(|active| predicate(active)) {
            Some(active) => {
                self.publisher.emit(ABORT_SENT, LogLevel::Warning);
                active.cancel.cancel();
                bot_debug!("cancellation requested for {}", active.id);
            }
            None => self.publisher.emit(NOTHING_TO_ABORT, LogLevel::Info),
        }
    }

    pub fn status(&self, handle: &RunHandle) -> RunStatus {
        let shared = self.lock();
        if is_active(&shared, handle.id) {
            RunStatus::Running
        } else {
            handle.status()
        }
    }

    /// `Running` for the active run, `Idle` for any other id. The controller
    /// keeps no record of finished runs; their handles carry the final status.
    pub fn status_of(&self, id: RunId) -> RunStatus {
        if is_active(&self.lock(), id) {
            RunStatus::Running
        } else {
            RunStatus::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().active.is_some()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.lock().active.as_ref().map(|active| active.id)
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn is_active(shared: &Shared, id: RunId) -> bool {
    shared.active.as_ref().is_some_and(|active| active.id == id)
}

/// Caller's view of one run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    status: watch::Receiver<RunStatus>,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn status(&self) -> RunStatus {
        *self.status.borrow()
    }

    /// Resolves once the run has completed or been aborted.
    pub async fn wait(mut self) -> RunStatus {
        match self.status.wait_for(|status| status.is_finished()).await {
            Ok(status) => *status,
            // Sender gone without a final status; treat as aborted.
            Err(_) => RunStatus::Aborted,
        }
    }
}

struct RunTask {
    id: RunId,
    machine: RunMachine,
    cancel: CancellationToken,
    publisher: LogPublisher,
    shared: Arc<Mutex<Shared>>,
    status_tx: watch::Sender<RunStatus>,
}

impl RunTask {
    async fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        loop {
            let pause = {
                let mut shared = lock_shared(&shared);
                match self.checkpoint() {
                    ControlFlow::Continue(pause) => pause,
                    ControlFlow::Break(status) => {
                        self.finish(&mut shared, status);
                        return;
                    }
                }
            };
            // Pauses are never cut short; cancellation waits for the next checkpoint.
            if pause.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(pause).await;
            }
        }
    }

    /// Observe cancellation, then take one step. Called with the controller lock held.
    fn checkpoint(&mut self) -> ControlFlow<RunStatus, Duration> {
        if self.cancel.is_cancelled() {
            let message = if self.machine.phase().is_mid_row() {
                ABORTED_MID_ROW
            } else {
                ABORTED_BETWEEN_ROWS
            };
            self.publisher.emit(message, LogLevel::Error);
            return ControlFlow::Break(RunStatus::Aborted);
        }

        let Some(step) = self.machine.advance() else {
            self.publisher.emit(COMPLETED, LogLevel::Info);
            return ControlFlow::Break(RunStatus::Completed);
        };
        if let Some((level, message)) = step.log {
            self.publisher.emit(message, level);
        }
        ControlFlow::Continue(step.pause)
    }

    fn finish(&self, shared: &mut Shared, status: RunStatus) {
        if is_active(shared, self.id) {
            shared.active = None;
        }
        bot_info!("{} finished: {:?}", self.id, status);
        let _ = self.status_tx.send(status);
    }
}
