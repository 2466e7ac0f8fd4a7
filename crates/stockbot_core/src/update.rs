use crate::{AppState, Effect, LogLevel, Msg, Notification, ResetPrompt, RowStore, Tab};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => vec![Effect::LoadPrefilled],
        Msg::TabSelected(tab) => {
            if state.active_tab() != tab {
                state.set_active_tab(tab);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RowFieldEdited { id, field, value } => {
            state.map_active_rows(|rows| rows.updated(id, field, value));
            state.mark_dirty();
            Vec::new()
        }
        Msg::RowFilesChanged { id, files } => {
            state.map_active_rows(|rows| rows.with_attachments(id, files));
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddRowClicked => {
            state.map_active_rows(RowStore::with_row_appended);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeleteRowClicked(id) => {
            state.map_active_rows(|rows| rows.without_row(id));
            state.mark_dirty();
            Vec::new()
        }
        Msg::DestinationToggled(destination) => {
            state.destinations_mut().toggle(destination);
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartClicked => start_clicked(&mut state),
        Msg::AbortClicked => vec![Effect::AbortRun],
        Msg::OpenFolderClicked => vec![Effect::OpenLatestRunFolder],
        Msg::ResetClicked => {
            state.set_reset_prompt(Some(ResetPrompt::for_tab(state.active_tab())));
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResetConfirmed => reset_confirmed(&mut state),
        Msg::ResetCancelled => {
            if state.take_reset_prompt().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ClearLogsClicked => {
            if !state.logs().is_empty() {
                state.logs_mut().clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PrefilledLoaded(stocks) => {
            let rows = stocks.into_iter().map(|stock| stock.into_row()).collect();
            state.replace_rows(Tab::Data, RowStore::from_entries(rows));
            state.mark_dirty();
            Vec::new()
        }
        Msg::PrefilledLoadFailed(reason) => {
            state.replace_rows(Tab::Data, RowStore::new());
            state.logs_mut().append(
                format!("Failed to load pre-filled stock data: {reason}"),
                LogLevel::Error,
            );
            state.mark_dirty();
            Vec::new()
        }
        Msg::LogReceived(entry) => {
            state.logs_mut().push(entry);
            state.mark_dirty();
            Vec::new()
        }
        Msg::NotificationRaised(notification) => {
            state.set_notification(Some(notification));
            state.mark_dirty();
            Vec::new()
        }
        Msg::NotificationDismissed => {
            if state.notification().is_some() {
                state.set_notification(None);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Rows reach the run controller only after passing validation here.
fn start_clicked(state: &mut AppState) -> Vec<Effect> {
    if !state.active_rows().is_valid() {
        state.set_validation_error(true);
        state.set_notification(Some(Notification::validation_failed()));
        state.mark_dirty();
        return Vec::new();
    }

    state.set_validation_error(false);
    state.mark_dirty();
    vec![Effect::StartRun {
        rows: state.active_rows().rows().to_vec(),
        destinations: state.destinations(),
    }]
}

fn reset_confirmed(state: &mut AppState) -> Vec<Effect> {
    let Some(prompt) = state.take_reset_prompt() else {
        return Vec::new();
    };

    let effects = match prompt.tab {
        Tab::Input => {
            state.replace_rows(Tab::Input, RowStore::with_empty_row());
            Vec::new()
        }
        Tab::Data => vec![Effect::LoadPrefilled],
    };
    state.logs_mut().append(
        format!("'{}' tab has been reset.", prompt.tab.label()),
        LogLevel::Info,
    );
    state.mark_dirty();
    effects
}
