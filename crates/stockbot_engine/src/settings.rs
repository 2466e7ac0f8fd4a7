use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time for folder names.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Pause lengths for each checkpoint of a simulated run.
#[derive(Clone)]
pub struct RunSettings {
    /// After "execution started".
    pub step_pause: Duration,
    /// After the folder entry.
    pub folder_pause: Duration,
    /// After each saved image.
    pub image_pause: Duration,
    /// Between rows.
    pub row_pause: Duration,
    pub clock: Clock,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            step_pause: Duration::from_millis(1000),
            folder_pause: Duration::from_millis(500),
            image_pause: Duration::from_millis(300),
            row_pause: Duration::from_millis(500),
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }
}

impl fmt::Debug for RunSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSettings")
            .field("step_pause", &self.step_pause)
            .field("folder_pause", &self.folder_pause)
            .field("image_pause", &self.image_pause)
            .field("row_pause", &self.row_pause)
            .finish_non_exhaustive()
    }
}

/// Limits for fetching the prefilled resource over HTTP.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}
