#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Shell finished starting up.
    AppStarted,
    /// User switched between the input and data tabs.
    TabSelected(crate::Tab),
    /// User edited a text field of a row in the active tab.
    RowFieldEdited {
        id: crate::RowId,
        field: crate::RowField,
        value: String,
    },
    /// User picked a new set of files for a row in the active tab.
    RowFilesChanged {
        id: crate::RowId,
        files: Vec<crate::Attachment>,
    },
    AddRowClicked,
    DeleteRowClicked(crate::RowId),
    DestinationToggled(crate::Destination),
    StartClicked,
    AbortClicked,
    /// User clicked "Go to folder".
    OpenFolderClicked,
    /// User asked to reset the active tab; confirmation is still pending.
    ResetClicked,
    ResetConfirmed,
    ResetCancelled,
    ClearLogsClicked,
    /// Prefilled resource loaded successfully.
    PrefilledLoaded(Vec<crate::PrefilledStock>),
    /// Prefilled resource could not be loaded.
    PrefilledLoadFailed(String),
    /// Engine published a log entry.
    LogReceived(crate::LogEntry),
    /// Engine or shell wants to show a transient message.
    NotificationRaised(crate::Notification),
    NotificationDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
