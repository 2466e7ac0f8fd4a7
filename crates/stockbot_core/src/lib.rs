//! Stockbot core: pure form state, log sink and the update state machine.
mod effect;
mod log_sink;
mod msg;
mod prefilled;
mod row;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use log_sink::{local_timestamp, LogEntry, LogLevel, LogSink};
pub use msg::Msg;
pub use prefilled::{parse_prefilled, PrefilledError, PrefilledStock};
pub use row::{Attachment, RowField, RowId, RowStore, StockEntry};
pub use state::{AppState, Destination, Destinations, Notification, ResetPrompt, Tab};
pub use update::update;
pub use view_model::{AppViewModel, RowView};
