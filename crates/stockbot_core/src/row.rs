use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Opaque row identifier, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file the user attached to a row. Only the handle is kept; nothing is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    path: PathBuf,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, or the whole path when there is none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    id: RowId,
    pub isin: String,
    pub code: String,
    pub name: String,
    pub comment: String,
    pub attachments: Vec<Attachment>,
}

impl StockEntry {
    /// Fresh row with a new id and every field empty.
    pub fn empty() -> Self {
        Self {
            id: RowId::new(),
            isin: String::new(),
            code: String::new(),
            name: String::new(),
            comment: String::new(),
            attachments: Vec::new(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// isin and code are both required before a run may start.
    pub fn is_complete(&self) -> bool {
        !self.isin.is_empty() && !self.code.is_empty()
    }

    fn set(&mut self, field: RowField, value: String) {
        match field {
            RowField::Isin => self.isin = value,
            RowField::Code => self.code = value,
            RowField::Name => self.name = value,
            RowField::Comment => self.comment = value,
        }
    }
}

/// Text fields a user can edit in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Isin,
    Code,
    Name,
    Comment,
}

/// Ordered list of stock rows.
///
/// Every mutation consumes the store and returns the new one. Unknown ids are
/// ignored silently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowStore {
    rows: Vec<StockEntry>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a single empty row, the initial shape of the input tab.
    pub fn with_empty_row() -> Self {
        Self::new().with_row_appended()
    }

    pub fn from_entries(rows: Vec<StockEntry>) -> Self {
        Self { rows }
    }

    pub fn create_empty_row() -> StockEntry {
        StockEntry::empty()
    }

    pub fn updated(mut self, id: RowId, field: RowField, value: impl Into<String>) -> Self {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.set(field, value.into());
        }
        self
    }

    pub fn with_attachments(mut self, id: RowId, files: Vec<Attachment>) -> Self {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.attachments = files;
        }
        self
    }

    pub fn with_row_appended(mut self) -> Self {
        self.rows.push(Self::create_empty_row());
        self
    }

    pub fn without_row(mut self, id: RowId) -> Self {
        self.rows.retain(|row| row.id != id);
        self
    }

    pub fn rows(&self) -> &[StockEntry] {
        &self.rows
    }

    pub fn get(&self, id: RowId) -> Option<&StockEntry> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids of rows missing isin or code, in store order.
    pub fn invalid_rows(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|row| !row.is_complete())
            .map(|row| row.id)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(StockEntry::is_complete)
    }
}
