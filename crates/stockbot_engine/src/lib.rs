//! Stockbot engine: run controller, log publishing and effect execution.
mod controller;
mod engine;
mod folder;
mod machine;
mod prefilled;
mod publisher;
mod settings;
mod types;

pub use controller::{RunController, RunHandle};
pub use engine::{EngineConfig, EngineHandle};
pub use folder::{FolderOpener, FolderOutcome, MockFolderOpener};
pub use machine::{folder_name, RowPhase, RunMachine, Step};
pub use prefilled::{load_prefilled, FileLoader, HttpLoader, PrefilledLoader, PrefilledSource};
pub use publisher::{LogPublisher, LogSubscription, SubscriptionId};
pub use settings::{Clock, FetchSettings, RunSettings};
pub use types::{EngineEvent, LoadError, RunId, RunStatus, StartRejected};
