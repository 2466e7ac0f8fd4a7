use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stockbot_core::{Effect, Msg};
use stockbot_engine::{EngineConfig, EngineEvent, EngineHandle, RunStatus};
use stockbot_logging::{bot_info, bot_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let engine = Arc::new(EngineHandle::new(config));
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { rows, destinations } => {
                    bot_info!(
                        "StartRun rows={} destinations={:?}",
                        rows.len(),
                        destinations.enabled()
                    );
                    self.engine.start_run(rows, destinations);
                }
                Effect::AbortRun => self.engine.abort(),
                Effect::OpenLatestRunFolder => self.engine.open_latest_run_folder(),
                Effect::LoadPrefilled => self.engine.load_prefilled(),
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = Arc::clone(&self.engine);
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                let Some(msg) = map_event(event) else {
                    continue;
                };
                if event_tx.send(AppEvent::Msg(msg)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Log(entry) => Some(Msg::LogReceived(entry)),
        EngineEvent::PrefilledLoaded(stocks) => Some(Msg::PrefilledLoaded(stocks)),
        EngineEvent::PrefilledFailed(reason) => {
            bot_warn!("Prefilled load failed: {}", reason);
            Some(Msg::PrefilledLoadFailed(reason))
        }
        EngineEvent::Notice(notification) => Some(Msg::NotificationRaised(notification)),
        EngineEvent::RunFinished { run_id, status } => {
            match status {
                RunStatus::Aborted => bot_warn!("{} aborted", run_id),
                _ => bot_info!("{} finished: {:?}", run_id, status),
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use stockbot_core::{LogEntry, LogLevel};
    use stockbot_engine::RunId;

    use super::*;

    #[test]
    fn log_events_become_log_messages() {
        let entry = LogEntry::new("12:00:00", "Abort signal sent.", LogLevel::Warning);
        assert_eq!(
            map_event(EngineEvent::Log(entry.clone())),
            Some(Msg::LogReceived(entry))
        );
    }

    #[test]
    fn run_finished_is_not_forwarded() {
        let event = EngineEvent::RunFinished {
            run_id: RunId(1),
            status: RunStatus::Completed,
        };
        assert_eq!(map_event(event), None);
    }
}
