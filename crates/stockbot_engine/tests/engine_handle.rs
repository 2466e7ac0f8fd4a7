use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use stockbot_core::{Destinations, LogLevel, PrefilledStock, RowField, RowStore};
use stockbot_engine::{
    EngineConfig, EngineEvent, EngineHandle, FolderOpener, FolderOutcome, PrefilledSource,
    RunSettings, RunStatus,
};
use tempfile::TempDir;

fn fast_settings() -> RunSettings {
    RunSettings {
        step_pause: Duration::from_millis(1),
        folder_pause: Duration::from_millis(1),
        image_pause: Duration::from_millis(1),
        row_pause: Duration::from_millis(1),
        ..RunSettings::default()
    }
}

/// Collect events until `done` accepts what has arrived, or fail after a few seconds.
fn collect_all(engine: &EngineHandle, done: impl Fn(&[EngineEvent]) -> bool) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => {
                events.push(event);
                if done(&events) {
                    return events;
                }
            }
            None => thread::sleep(Duration::from_millis(5)),
        }
    }
    panic!("timed out; events so far: {events:?}");
}

fn collect_until(engine: &EngineHandle, done: impl Fn(&EngineEvent) -> bool) -> Vec<EngineEvent> {
    collect_all(engine, |events| events.last().is_some_and(&done))
}

#[test]
fn prefilled_file_is_loaded_through_engine() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("stocks.json");
    fs::write(&file, r#"[{"isin":"A1","code":"C1","name":"One"}]"#).unwrap();

    let engine = EngineHandle::new(EngineConfig {
        prefilled: PrefilledSource::File(file),
        ..EngineConfig::default()
    });
    engine.load_prefilled();

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::PrefilledLoaded(_)));
    assert_eq!(
        events.last(),
        Some(&EngineEvent::PrefilledLoaded(vec![PrefilledStock {
            isin: "A1".to_string(),
            code: "C1".to_string(),
            name: Some("One".to_string()),
        }]))
    );
}

#[test]
fn unreachable_prefilled_source_reports_failure() {
    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineConfig {
        prefilled: PrefilledSource::File(temp.path().join("nope.json")),
        ..EngineConfig::default()
    });
    engine.load_prefilled();

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::PrefilledFailed(_)));
    assert!(matches!(events.last(), Some(EngineEvent::PrefilledFailed(_))));
}

#[test]
fn run_streams_logs_and_reports_completion() {
    let engine = EngineHandle::new(EngineConfig {
        run: fast_settings(),
        ..EngineConfig::default()
    });
    let store = RowStore::with_empty_row();
    let id = store.rows()[0].id();
    let store = store
        .updated(id, RowField::Isin, "A1")
        .updated(id, RowField::Code, "C1");

    engine.start_run(store.rows().to_vec(), Destinations::default());

    let completed = |e: &EngineEvent| {
        matches!(e, EngineEvent::Log(entry) if entry.message() == "Run completed successfully.")
    };
    let finished = |e: &EngineEvent| {
        matches!(
            e,
            EngineEvent::RunFinished {
                status: RunStatus::Completed,
                ..
            }
        )
    };
    let events = collect_all(&engine, |events| {
        events.iter().any(completed) && events.iter().any(finished)
    });
    let first_log = events.iter().find_map(|e| match e {
        EngineEvent::Log(entry) => Some(entry.clone()),
        _ => None,
    });
    let first_log = first_log.unwrap();
    assert_eq!(first_log.level(), LogLevel::Step);
    assert_eq!(first_log.message(), "Execution started for stock C1");
}

#[test]
fn abort_without_run_is_logged() {
    let engine = EngineHandle::new(EngineConfig::default());
    engine.abort();

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::Log(_)));
    match events.last() {
        Some(EngineEvent::Log(entry)) => {
            assert_eq!(entry.level(), LogLevel::Info);
            assert_eq!(entry.message(), "No bot run is currently active.");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

struct FixedOpener;

impl FolderOpener for FixedOpener {
    fn open_latest_run_folder(&self) -> FolderOutcome {
        FolderOutcome::Opened("runs/C1_20240307_0905".into())
    }
}

#[test]
fn folder_request_logs_and_notifies() {
    let engine = EngineHandle::new(EngineConfig::default());
    engine.open_latest_run_folder();

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::Notice(_)));
    match events.last() {
        Some(EngineEvent::Notice(notice)) => assert_eq!(notice.title, "Not implemented"),
        other => panic!("unexpected event {other:?}"),
    }

    let engine = EngineHandle::new(EngineConfig {
        folder_opener: Arc::new(FixedOpener),
        ..EngineConfig::default()
    });
    engine.open_latest_run_folder();
    let events = collect_until(&engine, |e| matches!(e, EngineEvent::Notice(_)));
    match events.last() {
        Some(EngineEvent::Notice(notice)) => {
            assert_eq!(notice.description, "runs/C1_20240307_0905")
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn folder_log_entry_arrives_before_its_notice() {
    for _ in 0..20 {
        let engine = EngineHandle::new(EngineConfig::default());
        engine.open_latest_run_folder();

        let events = collect_until(&engine, |e| matches!(e, EngineEvent::Notice(_)));
        let logged_at = events.iter().position(|e| {
            matches!(e, EngineEvent::Log(entry)
                if entry.message() == "Opening latest run folder... (mocked)")
        });
        assert_eq!(logged_at, Some(events.len() - 2), "{events:?}");
    }
}

#[test]
fn run_finished_follows_final_log_entry() {
    let engine = EngineHandle::new(EngineConfig {
        run: fast_settings(),
        ..EngineConfig::default()
    });
    engine.start_run(Vec::new(), Destinations::default());

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::RunFinished { .. }));
    let before = &events[events.len() - 2];
    assert!(
        matches!(before, EngineEvent::Log(entry) if entry.message() == "Run completed successfully."),
        "{events:?}"
    );
}
