use std::sync::Arc;

use crate::domain::entities::payment::{PaymentRecord, RawPaymentRow};
use crate::domain::entities::query::{LedgerFilter, LedgerView, SkippedRow};
use crate::usecase::ports::repo::{LedgerRepository, RepoError};

pub struct QueryService {
    repo: Arc<dyn LedgerRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self { repo }
    }

    pub fn search(&self, filter: &LedgerFilter) -> Result<LedgerView, RepoError> {
        let rows = self.repo.load_rows()?;
        Ok(filter_rows(&rows, filter))
    }
}

/// Rows that fail the ingestion schema are skipped and reported, never
/// fatal: the sheet is free text and one stray cell must not take down the
/// whole query.
pub fn filter_rows(rows: &[RawPaymentRow], filter: &LedgerFilter) -> LedgerView {
    let needle = filter.customer.trim();
    let mut view = LedgerView {
        total_rows: rows.len(),
        ..LedgerView::default()
    };

    for (row_idx, raw) in rows.iter().enumerate() {
        let record = match PaymentRecord::from_raw(raw) {
            Ok(record) => record,
            Err(err) => {
                view.skipped.push(SkippedRow {
                    row_idx,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if !needle.is_empty() && !record.customer.contains(needle) {
            continue;
        }
        if let Some(window) = filter.window {
            if !window.contains(record.date) {
                continue;
            }
        }

        view.amount_total += record.amount;
        view.records.push(record);
    }

    view
}
