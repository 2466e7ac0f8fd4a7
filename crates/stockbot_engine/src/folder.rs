use std::path::PathBuf;

/// Result of asking the host shell to reveal the latest run folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    Opened(PathBuf),
    Unsupported { notice: String },
}

/// Host integration seam for "Go to folder".
pub trait FolderOpener: Send + Sync {
    fn open_latest_run_folder(&self) -> FolderOutcome;
}

/// Placeholder: there is no host shell to talk to yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockFolderOpener;

impl FolderOpener for MockFolderOpener {
    fn open_latest_run_folder(&self) -> FolderOutcome {
        FolderOutcome::Unsupported {
            notice: "This would open the file explorer to the latest run folder.".to_string(),
        }
    }
}
