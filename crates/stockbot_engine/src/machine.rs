use std::time::Duration;

use chrono::NaiveDateTime;
use stockbot_core::{LogLevel, StockEntry};

use crate::settings::RunSettings;

/// Where the current row stands. Each transition emits at most one log entry
/// and is followed by one pause; cancellation is checked between transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    /// Nothing emitted for this row yet.
    Pending,
    Started,
    FolderCreated,
    /// Some but not all attachments saved.
    SavingImages { saved: usize },
    ImagesSaved,
    RowComplete,
}

impl RowPhase {
    /// True while a row still has entries to emit. Once its images are
    /// saved (or skipped) only the pause before the next row remains.
    pub fn is_mid_row(self) -> bool {
        matches!(
            self,
            RowPhase::Started | RowPhase::FolderCreated | RowPhase::SavingImages { .. }
        )
    }
}

/// One transition of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub row: usize,
    pub phase: RowPhase,
    pub log: Option<(LogLevel, String)>,
    pub pause: Duration,
}

/// Sequential per-row state machine over a snapshot of rows.
///
/// Pure: it never sleeps and never checks cancellation. The scheduler in
/// `controller` does both between calls to [`RunMachine::advance`].
pub struct RunMachine {
    rows: Vec<StockEntry>,
    settings: RunSettings,
    row: usize,
    phase: RowPhase,
}

impl RunMachine {
    pub fn new(rows: Vec<StockEntry>, settings: RunSettings) -> Self {
        Self {
            rows,
            settings,
            row: 0,
            phase: RowPhase::Pending,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn phase(&self) -> RowPhase {
        self.phase
    }

    /// Advance one checkpoint. `None` once every row is complete.
    pub fn advance(&mut self) -> Option<Step> {
        let entry = self.rows.get(self.row)?;
        let code = entry.code.clone();
        let images = entry.attachments.len();

        let (next, log, pause) = match self.phase {
            RowPhase::Pending => (
                RowPhase::Started,
                Some((LogLevel::Step, format!("Execution started for stock {code}"))),
                self.settings.step_pause,
            ),
            RowPhase::Started => {
                let folder = folder_name(&code, (self.settings.clock)());
                (
                    RowPhase::FolderCreated,
                    Some((LogLevel::Info, format!("Created folder {folder}"))),
                    self.settings.folder_pause,
                )
            }
            RowPhase::FolderCreated if images == 0 => (
                RowPhase::ImagesSaved,
                Some((
                    LogLevel::Info,
                    format!("No image uploaded for {code}, skipping save."),
                )),
                Duration::ZERO,
            ),
            RowPhase::FolderCreated => self.save_image(0),
            RowPhase::SavingImages { saved } => self.save_image(saved),
            RowPhase::ImagesSaved => (RowPhase::RowComplete, None, self.settings.row_pause),
            RowPhase::RowComplete => {
                self.row += 1;
                self.phase = RowPhase::Pending;
                return self.advance();
            }
        };

        self.phase = next;
        Some(Step {
            row: self.row,
            phase: next,
            log,
            pause,
        })
    }

    fn save_image(&self, index: usize) -> (RowPhase, Option<(LogLevel, String)>, Duration) {
        let attachments = &self.rows[self.row].attachments;
        let saved = index + 1;
        let next = if saved >= attachments.len() {
            RowPhase::ImagesSaved
        } else {
            RowPhase::SavingImages { saved }
        };
        let message = format!("Saved uploaded image: {}", attachments[index].file_name());
        (next, Some((LogLevel::Info, message)), self.settings.image_pause)
    }
}

/// `<code>_<YYYYMMDD_HHMM>` in local time.
pub fn folder_name(code: &str, now: NaiveDateTime) -> String {
    format!("{code}_{}", now.format("%Y%m%d_%H%M"))
}
