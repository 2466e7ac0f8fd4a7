use std::sync::Once;

use stockbot_core::{
    update, AppState, Attachment, Destination, Msg, PrefilledStock, RowField, RowId, Tab,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(stockbot_logging::initialize_for_tests);
}

fn first_row_id(state: &AppState) -> RowId {
    state.view().rows[0].id
}

fn stock(isin: &str, code: &str, name: Option<&str>) -> PrefilledStock {
    PrefilledStock {
        isin: isin.to_string(),
        code: code.to_string(),
        name: name.map(str::to_string),
    }
}

#[test]
fn input_tab_starts_with_one_empty_row() {
    init_logging();
    let view = AppState::new().view();

    assert_eq!(view.active_tab, Tab::Input);
    assert_eq!(view.rows.len(), 1);
    assert!(view.rows[0].isin.is_empty());
    assert_eq!(view.rows[0].attachment_count, 0);
}

#[test]
fn field_edits_apply_to_matching_row_only() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::AddRowClicked);
    let id = first_row_id(&state);

    let (mut state, effects) = update(
        state,
        Msg::RowFieldEdited {
            id,
            field: RowField::Code,
            value: "TCS".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.rows[0].code, "TCS");
    assert_eq!(view.rows[1].code, "");
}

#[test]
fn unknown_row_id_is_ignored() {
    init_logging();
    let state = AppState::new();
    let rows_before = state.view().rows;

    let (state, _) = update(
        state,
        Msg::RowFieldEdited {
            id: RowId::new(),
            field: RowField::Isin,
            value: "X".to_string(),
        },
    );
    let (state, _) = update(state, Msg::DeleteRowClicked(RowId::new()));

    assert_eq!(state.view().rows, rows_before);
}

#[test]
fn files_replace_previous_attachments() {
    init_logging();
    let state = AppState::new();
    let id = first_row_id(&state);

    let (state, _) = update(
        state,
        Msg::RowFilesChanged {
            id,
            files: vec![Attachment::new("a.png"), Attachment::new("b.png")],
        },
    );
    assert_eq!(state.view().rows[0].attachment_count, 2);

    let (state, _) = update(
        state,
        Msg::RowFilesChanged {
            id,
            files: vec![Attachment::new("c.png")],
        },
    );
    let row = state.active_rows().get(id).unwrap().clone();
    assert_eq!(row.attachments, vec![Attachment::new("c.png")]);
}

#[test]
fn delete_removes_row_and_keeps_order() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::AddRowClicked);
    let (state, _) = update(state, Msg::AddRowClicked);
    let ids: Vec<_> = state.view().rows.iter().map(|r| r.id).collect();

    let (state, _) = update(state, Msg::DeleteRowClicked(ids[1]));

    let remaining: Vec<_> = state.view().rows.iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![ids[0], ids[2]]);
}

#[test]
fn row_operations_follow_active_tab() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::PrefilledLoaded(vec![stock("INE009A01021", "INFY", Some("Infosys"))]),
    );
    let (state, _) = update(state, Msg::TabSelected(Tab::Data));
    let (state, _) = update(state, Msg::AddRowClicked);

    assert_eq!(state.rows(Tab::Data).len(), 2);
    assert_eq!(state.rows(Tab::Input).len(), 1);
    assert_eq!(state.view().rows[0].name, "Infosys");
}

#[test]
fn prefilled_rows_replace_data_tab() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::AppStarted);
    assert_eq!(effects, vec![stockbot_core::Effect::LoadPrefilled]);

    let (state, _) = update(
        state,
        Msg::PrefilledLoaded(vec![stock("A1", "C1", None), stock("A2", "C2", None)]),
    );
    let (state, _) = update(state, Msg::PrefilledLoaded(vec![stock("A3", "C3", None)]));

    let data = state.rows(Tab::Data);
    assert_eq!(data.len(), 1);
    assert_eq!(data.rows()[0].code, "C3");
    assert_eq!(data.rows()[0].name, "");
}

#[test]
fn failed_prefilled_load_logs_error_and_empties_data_tab() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::PrefilledLoaded(vec![stock("A1", "C1", None)]),
    );

    let (state, effects) = update(state, Msg::PrefilledLoadFailed("not found".to_string()));

    assert!(effects.is_empty());
    assert!(state.rows(Tab::Data).is_empty());
    let logs = state.view().logs;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level(), stockbot_core::LogLevel::Error);
    assert!(logs[0].message().contains("not found"));
}

#[test]
fn destination_toggles_flip_one_flag() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DestinationToggled(Destination::Tradingview));
    let destinations = state.destinations();
    assert!(destinations.is_enabled(Destination::Tradingview));
    assert!(!destinations.is_enabled(Destination::Moneycontrol));
    assert_eq!(destinations.enabled(), vec![Destination::Tradingview]);

    let (state, _) = update(state, Msg::DestinationToggled(Destination::Tradingview));
    assert!(state.destinations().enabled().is_empty());
}
