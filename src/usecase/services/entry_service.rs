use std::sync::Arc;

use crate::domain::entities::payment::{format_amount, parse_amount, PaymentKind, RawPaymentRow};
use crate::domain::roc::{self, AccountingPeriod};
use crate::usecase::ports::repo::{LedgerRepository, RepoError};

/// Form input for one new payment, still as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub date: String,
    pub customer: String,
    pub amount: String,
    pub kind: PaymentKind,
    pub responsible: String,
    pub period: Option<AccountingPeriod>,
    pub note: String,
}

pub struct EntryService {
    repo: Arc<dyn LedgerRepository>,
}

impl EntryService {
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self { repo }
    }

    pub fn append(&self, entry: &NewPayment) -> Result<RawPaymentRow, RepoError> {
        let row = serialize_entry(entry).map_err(RepoError::Message)?;
        self.repo.append_row(&row)?;
        Ok(row)
    }
}

/// Serializes the entry the way the sheet stores it: compact ROC date plus
/// an `RRR/MM` accounting-period label, defaulting the period to the
/// payment's month.
pub fn serialize_entry(entry: &NewPayment) -> Result<RawPaymentRow, String> {
    let date = roc::parse_flexible(&entry.date).map_err(|err| err.to_string())?;

    let customer = entry.customer.trim();
    if customer.is_empty() {
        return Err("customer name is required".to_string());
    }

    let amount = parse_amount(&entry.amount)
        .ok_or_else(|| format!("unparseable amount: {}", entry.amount))?;

    let period = match entry.period {
        Some(period) => period,
        None => AccountingPeriod::from_date(date).map_err(|err| err.to_string())?,
    };

    Ok(RawPaymentRow {
        date: roc::to_compact(date).map_err(|err| err.to_string())?,
        customer: customer.to_string(),
        amount: format_amount(amount),
        kind: entry.kind.as_str().to_string(),
        responsible: entry.responsible.trim().to_string(),
        period: period.label(),
        note: entry.note.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, customer: &str, amount: &str) -> NewPayment {
        NewPayment {
            date: date.to_string(),
            customer: customer.to_string(),
            amount: amount.to_string(),
            kind: PaymentKind::Check,
            responsible: "陳主辦".to_string(),
            period: None,
            note: " 月結 ".to_string(),
        }
    }

    #[test]
    fn entry_is_stored_in_compact_form_with_period_label() {
        let row = serialize_entry(&entry("113/01/05", "大成五金", "1,200"))
            .expect("entry should serialize");
        assert_eq!(row.date, "1130105");
        assert_eq!(row.period, "113/01");
        assert_eq!(row.amount, "1200");
        assert_eq!(row.kind, "支票");
        assert_eq!(row.note, "月結");
    }

    #[test]
    fn explicit_period_overrides_the_derived_one() {
        let mut payment = entry("1130105", "大成五金", "800");
        payment.period = Some(AccountingPeriod::parse("112/12").expect("period should parse"));
        let row = serialize_entry(&payment).expect("entry should serialize");
        assert_eq!(row.period, "112/12");
    }

    #[test]
    fn invalid_form_input_is_rejected() {
        assert!(serialize_entry(&entry("下週", "大成五金", "800")).is_err());
        assert!(serialize_entry(&entry("1130105", "  ", "800")).is_err());
        assert!(serialize_entry(&entry("1130105", "大成五金", "八百")).is_err());
    }

    #[test]
    fn pre_epoch_dates_cannot_be_appended() {
        assert!(serialize_entry(&entry("1911-06-01", "大成五金", "800")).is_err());
    }
}
