use crate::{Destinations, LogEntry, Notification, ResetPrompt, RowId, Tab};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_tab: Tab,
    pub rows: Vec<RowView>,
    pub destinations: Destinations,
    pub logs: Vec<LogEntry>,
    pub notification: Option<Notification>,
    pub reset_prompt: Option<ResetPrompt>,
    pub validation_error: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: RowId,
    pub isin: String,
    pub code: String,
    pub name: String,
    pub comment: String,
    pub attachment_count: usize,
    /// Row is missing isin or code after a failed validation.
    pub has_error: bool,
}
