use anyhow::{anyhow, Result};

use crate::domain::entities::payment::{PaymentRecord, RawPaymentRow};

// Sheet columns by the names the ledger actually uses, plus the English
// aliases seen in exported copies.
const DATE_NAMES: &[&str] = &["日期", "date"];
const CUSTOMER_NAMES: &[&str] = &["客戶名稱", "customername", "customer"];
const AMOUNT_NAMES: &[&str] = &["金額", "amount"];
const KIND_NAMES: &[&str] = &["型式", "type"];
const RESPONSIBLE_NAMES: &[&str] = &["負責人員", "responsible"];
const PERIOD_NAMES: &[&str] = &["帳款月份", "accountingperiod", "period"];
const NOTE_NAMES: &[&str] = &["備註", "note"];

/// Header positions of the ledger columns inside one imported sheet.
/// 負責人員, 帳款月份 and 備註 may be absent; the rest are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub customer: usize,
    pub amount: usize,
    pub kind: usize,
    pub responsible: Option<usize>,
    pub period: Option<usize>,
    pub note: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Result<ColumnMap> {
        let find = |names: &[&str]| {
            headers.iter().position(|header| {
                let normalized = header.trim().to_ascii_lowercase();
                names.iter().any(|name| normalized == *name)
            })
        };
        let required = |names: &[&str], label: &str| {
            find(names).ok_or_else(|| anyhow!("missing required column: {label}"))
        };

        Ok(ColumnMap {
            date: required(DATE_NAMES, "日期")?,
            customer: required(CUSTOMER_NAMES, "客戶名稱")?,
            amount: required(AMOUNT_NAMES, "金額")?,
            kind: required(KIND_NAMES, "型式")?,
            responsible: find(RESPONSIBLE_NAMES),
            period: find(PERIOD_NAMES),
            note: find(NOTE_NAMES),
        })
    }

    pub fn row_from_cells(&self, cells: &[String]) -> RawPaymentRow {
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        let optional = |idx: Option<usize>| idx.map(|i| cell(i)).unwrap_or_default();

        RawPaymentRow {
            date: cell(self.date),
            customer: cell(self.customer),
            amount: cell(self.amount),
            kind: cell(self.kind),
            responsible: optional(self.responsible),
            period: optional(self.period),
            note: optional(self.note),
        }
    }
}

/// How many imported rows would fail the ingestion schema. Flagged rows are
/// still imported; queries skip and report them individually.
pub fn flagged_row_count(rows: &[RawPaymentRow]) -> usize {
    rows.iter()
        .filter(|row| PaymentRecord::from_raw(row).is_err())
        .count()
}
