use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::thread;

use stockbot_core::{Destinations, LogLevel, Notification, StockEntry};
use stockbot_logging::{bot_debug, bot_error, bot_warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::controller::RunController;
use crate::folder::{FolderOpener, FolderOutcome, MockFolderOpener};
use crate::prefilled::{load_prefilled, PrefilledSource};
use crate::publisher::{LogPublisher, LogSubscription};
use crate::settings::{FetchSettings, RunSettings};
use crate::EngineEvent;

const OPENING_FOLDER: &str = "Opening latest run folder... (mocked)";

pub struct EngineConfig {
    pub run: RunSettings,
    pub fetch: FetchSettings,
    pub prefilled: PrefilledSource,
    pub folder_opener: Arc<dyn FolderOpener>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run: RunSettings::default(),
            fetch: FetchSettings::default(),
            prefilled: PrefilledSource::default(),
            folder_opener: Arc::new(MockFolderOpener),
        }
    }
}

enum EngineCommand {
    StartRun {
        rows: Vec<StockEntry>,
        destinations: Destinations,
    },
    Abort,
    OpenLatestRunFolder,
    LoadPrefilled,
}

/// Synchronous front for the run controller, backed by its own tokio runtime thread.
///
/// The runtime is single-threaded: runs, loads and command handling take
/// turns at their await points.
pub struct EngineHandle {
    cmd_tx: UnboundedSender<EngineCommand>,
    event_rx: Mutex<std_mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = std_mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    bot_error!("failed to start engine runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(serve(config, cmd_rx, event_tx));
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    pub fn start_run(&self, rows: Vec<StockEntry>, destinations: Destinations) {
        self.send(EngineCommand::StartRun { rows, destinations });
    }

    pub fn abort(&self) {
        self.send(EngineCommand::Abort);
    }

    pub fn open_latest_run_folder(&self) {
        self.send(EngineCommand::OpenLatestRunFolder);
    }

    pub fn load_prefilled(&self) {
        self.send(EngineCommand::LoadPrefilled);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        let rx = self
            .event_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            bot_warn!("engine thread is gone; command dropped");
        }
    }
}

/// Command loop; ends when the handle is dropped.
async fn serve(
    config: EngineConfig,
    mut cmd_rx: UnboundedReceiver<EngineCommand>,
    event_tx: std_mpsc::Sender<EngineEvent>,
) {
    let controller = RunController::new(config.run.clone(), LogPublisher::new());
    let (notice_tx, notice_rx) = unbounded_channel();
    tokio::spawn(forward_events(controller.subscribe(), notice_rx, event_tx));

    while let Some(command) = cmd_rx.recv().await {
        handle_command(&controller, &config, command, &notice_tx);
    }
}

/// Merge run log entries and other engine events into the shell's queue.
///
/// Log entries win every tie, so an entry published before an event was raised
/// is always delivered ahead of it.
async fn forward_events(
    mut logs: LogSubscription,
    mut events: UnboundedReceiver<EngineEvent>,
    event_tx: std_mpsc::Sender<EngineEvent>,
) {
    loop {
        let event = tokio::select! {
            biased;
            Some(entry) = logs.recv() => EngineEvent::Log(entry),
            Some(event) = events.recv() => event,
            else => break,
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
}

fn handle_command(
    controller: &RunController,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: &UnboundedSender<EngineEvent>,
) {
    match command {
        EngineCommand::StartRun { rows, destinations } => {
            bot_debug!("run destinations: {:?}", destinations.enabled());
            // A rejected start has already been logged by the controller.
            if let Ok(handle) = controller.start(rows) {
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let run_id = handle.id();
                    let status = handle.wait().await;
                    let _ = event_tx.send(EngineEvent::RunFinished { run_id, status });
                });
            }
        }
        EngineCommand::Abort => controller.abort_active(),
        EngineCommand::OpenLatestRunFolder => {
            controller.publisher().emit(OPENING_FOLDER, LogLevel::Info);
            let event = match config.folder_opener.open_latest_run_folder() {
                FolderOutcome::Opened(path) => EngineEvent::Notice(Notification::info(
                    "Folder opened",
                    path.display().to_string(),
                )),
                FolderOutcome::Unsupported { notice } => {
                    EngineEvent::Notice(Notification::info("Not implemented", notice))
                }
            };
            let _ = event_tx.send(event);
        }
        EngineCommand::LoadPrefilled => {
            let source = config.prefilled.clone();
            let fetch = config.fetch.clone();
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                let event = match load_prefilled(&source, &fetch).await {
                    Ok(stocks) => EngineEvent::PrefilledLoaded(stocks),
                    Err(err) => {
                        bot_warn!("prefilled load from {:?} failed: {}", source, err);
                        EngineEvent::PrefilledFailed(err.to_string())
                    }
                };
                let _ = event_tx.send(event);
            });
        }
    }
}
