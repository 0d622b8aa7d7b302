use crate::domain::entities::payment::RawPaymentRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Message(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepoError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetMeta {
    pub name: String,
    pub source_path: String,
    pub row_count: i64,
    pub imported_at: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSheetMeta {
    pub name: String,
    pub source_path: String,
}

/// Storage seam for the ledger mirror. The mirror holds the sheet verbatim:
/// raw text rows in, raw text rows out; typing happens in the domain.
pub trait LedgerRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn sheet_meta(&self) -> Result<Option<SheetMeta>, RepoError>;
    fn load_rows(&self) -> Result<Vec<RawPaymentRow>, RepoError>;

    fn replace_rows(&self, meta: NewSheetMeta, rows: &[RawPaymentRow]) -> Result<i64, RepoError>;
    fn append_row(&self, row: &RawPaymentRow) -> Result<(), RepoError>;
}

/// Launch audit log: bump the per-day counter, keep the timestamp, return
/// how many opens the day has seen.
pub trait UsageLog: Send + Sync {
    fn record_open(&self, day: &str, stamp: &str) -> Result<i64, RepoError>;
}
