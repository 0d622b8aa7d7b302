use crate::domain::entities::payment::PaymentRecord;
use crate::domain::window::DateWindow;

/// Query input from the UI boundary: customer substring plus an optional
/// explicit window. When no window is given the caller falls back to the
/// rolling default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerFilter {
    pub customer: String,
    pub window: Option<DateWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row_idx: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerView {
    pub records: Vec<PaymentRecord>,
    /// Sheet rows inspected, matching or not.
    pub total_rows: usize,
    /// Rows that failed the ingestion schema, reported in aggregate.
    pub skipped: Vec<SkippedRow>,
    pub amount_total: f64,
}
