use crate::log_sink::LogSink;
use crate::row::RowStore;
use crate::view_model::{AppViewModel, RowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Rows typed in by hand.
    #[default]
    Input,
    /// Rows imported from the prefilled resource.
    Data,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Input => "Input",
            Tab::Data => "Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Moneycontrol,
    StockReport,
    Tradingview,
}

impl Destination {
    pub const ALL: [Destination; 3] = [
        Destination::Moneycontrol,
        Destination::StockReport,
        Destination::Tradingview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Destination::Moneycontrol => "Moneycontrol",
            Destination::StockReport => "Stock Report",
            Destination::Tradingview => "Tradingview",
        }
    }
}

/// Destination checkboxes. All start unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destinations {
    moneycontrol: bool,
    stock_report: bool,
    tradingview: bool,
}

impl Destinations {
    pub fn is_enabled(&self, destination: Destination) -> bool {
        match destination {
            Destination::Moneycontrol => self.moneycontrol,
            Destination::StockReport => self.stock_report,
            Destination::Tradingview => self.tradingview,
        }
    }

    pub fn toggle(&mut self, destination: Destination) {
        let flag = match destination {
            Destination::Moneycontrol => &mut self.moneycontrol,
            Destination::StockReport => &mut self.stock_report,
            Destination::Tradingview => &mut self.tradingview,
        };
        *flag = !*flag;
    }

    pub fn enabled(&self) -> Vec<Destination> {
        Destination::ALL
            .into_iter()
            .filter(|d| self.is_enabled(*d))
            .collect()
    }
}

/// Transient message shown on top of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notification {
    pub fn validation_failed() -> Self {
        Self {
            title: "Validation Error".to_string(),
            description: "Please fill in Stock ISIN and Stock Code for all rows.".to_string(),
            destructive: true,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }
}

/// Pending confirmation for a tab reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPrompt {
    pub tab: Tab,
    pub title: &'static str,
    pub description: &'static str,
}

impl ResetPrompt {
    pub fn for_tab(tab: Tab) -> Self {
        match tab {
            Tab::Input => Self {
                tab,
                title: "Reset all input?",
                description: "This will clear all fields in the Input tab.",
            },
            Tab::Data => Self {
                tab,
                title: "Reload stored stock list?",
                description: "Any unsaved edits will be lost.",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    active_tab: Tab,
    input_rows: RowStore,
    data_rows: RowStore,
    logs: LogSink,
    destinations: Destinations,
    validation_error: bool,
    notification: Option<Notification>,
    reset_prompt: Option<ResetPrompt>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Input,
            input_rows: RowStore::with_empty_row(),
            data_rows: RowStore::new(),
            logs: LogSink::new(),
            destinations: Destinations::default(),
            validation_error: false,
            notification: None,
            reset_prompt: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .active_rows()
            .rows()
            .iter()
            .map(|row| RowView {
                id: row.id(),
                isin: row.isin.clone(),
                code: row.code.clone(),
                name: row.name.clone(),
                comment: row.comment.clone(),
                attachment_count: row.attachments.len(),
                has_error: self.validation_error && !row.is_complete(),
            })
            .collect();

        AppViewModel {
            active_tab: self.active_tab,
            rows,
            destinations: self.destinations,
            logs: self.logs.entries().to_vec(),
            notification: self.notification.clone(),
            reset_prompt: self.reset_prompt.clone(),
            validation_error: self.validation_error,
            dirty: self.dirty,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn rows(&self, tab: Tab) -> &RowStore {
        match tab {
            Tab::Input => &self.input_rows,
            Tab::Data => &self.data_rows,
        }
    }

    pub fn active_rows(&self) -> &RowStore {
        self.rows(self.active_tab)
    }

    pub fn logs(&self) -> &LogSink {
        &self.logs
    }

    pub fn destinations(&self) -> Destinations {
        self.destinations
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn reset_prompt(&self) -> Option<&ResetPrompt> {
        self.reset_prompt.as_ref()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Apply a store transformation to the active tab.
    pub(crate) fn map_active_rows(&mut self, f: impl FnOnce(RowStore) -> RowStore) {
        let slot = match self.active_tab {
            Tab::Input => &mut self.input_rows,
            Tab::Data => &mut self.data_rows,
        };
        *slot = f(std::mem::take(slot));
    }

    pub(crate) fn replace_rows(&mut self, tab: Tab, rows: RowStore) {
        match tab {
            Tab::Input => self.input_rows = rows,
            Tab::Data => self.data_rows = rows,
        }
    }

    pub(crate) fn logs_mut(&mut self) -> &mut LogSink {
        &mut self.logs
    }

    pub(crate) fn destinations_mut(&mut self) -> &mut Destinations {
        &mut self.destinations
    }

    pub(crate) fn set_validation_error(&mut self, failed: bool) {
        self.validation_error = failed;
    }

    pub(crate) fn set_notification(&mut self, notification: Option<Notification>) {
        self.notification = notification;
    }

    pub(crate) fn set_reset_prompt(&mut self, prompt: Option<ResetPrompt>) {
        self.reset_prompt = prompt;
    }

    pub(crate) fn take_reset_prompt(&mut self) -> Option<ResetPrompt> {
        self.reset_prompt.take()
    }
}
