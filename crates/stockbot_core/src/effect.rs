use crate::{Destinations, StockEntry};

/// Side effects requested by `update`, executed by the shell against the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a run over a snapshot of validated rows.
    StartRun {
        rows: Vec<StockEntry>,
        destinations: Destinations,
    },
    AbortRun,
    OpenLatestRunFolder,
    /// Fetch the prefilled stock resource into the data tab.
    LoadPrefilled,
}
