use std::fmt;

use chrono::NaiveDate;

use crate::domain::roc::{self, AccountingPeriod, CalendarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    Cash,
    Check,
    CheckAndCash,
}

impl PaymentKind {
    pub const ALL: [PaymentKind; 3] = [
        PaymentKind::Cash,
        PaymentKind::Check,
        PaymentKind::CheckAndCash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Cash => "現金",
            PaymentKind::Check => "支票",
            PaymentKind::CheckAndCash => "支票+現金",
        }
    }

    // Sheet cells carry a few spellings of the same three values.
    pub fn parse(input: &str) -> Option<PaymentKind> {
        match input.trim() {
            "現金" => Some(PaymentKind::Cash),
            "支票" => Some(PaymentKind::Check),
            "支票+現金" | "支票＋現金" | "現金+支票" => Some(PaymentKind::CheckAndCash),
            other => match other.to_ascii_lowercase().as_str() {
                "cash" => Some(PaymentKind::Cash),
                "check" | "cheque" => Some(PaymentKind::Check),
                "check+cash" | "cash+check" => Some(PaymentKind::CheckAndCash),
                _ => None,
            },
        }
    }
}

/// One sheet row exactly as stored: free text in every column. Nothing here
/// is trusted until it passes `PaymentRecord::from_raw`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPaymentRow {
    pub date: String,
    pub customer: String,
    pub amount: String,
    pub kind: String,
    pub responsible: String,
    pub period: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub customer: String,
    pub amount: f64,
    pub kind: PaymentKind,
    pub responsible: String,
    pub period: AccountingPeriod,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    BadDate(CalendarError),
    MissingCustomer,
    BadAmount(String),
    UnknownKind(String),
    BadPeriod(CalendarError),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::BadDate(err) => write!(f, "unparseable date ({err})"),
            RowError::MissingCustomer => write!(f, "customer name is empty"),
            RowError::BadAmount(value) => write!(f, "unparseable amount: {value}"),
            RowError::UnknownKind(value) => write!(f, "unknown payment type: {value}"),
            RowError::BadPeriod(err) => write!(f, "unparseable accounting period ({err})"),
        }
    }
}

impl std::error::Error for RowError {}

impl PaymentRecord {
    /// The ingestion schema: every untrusted row passes through here before
    /// anything else looks at it. A blank accounting period is derived from
    /// the payment date.
    pub fn from_raw(raw: &RawPaymentRow) -> Result<PaymentRecord, RowError> {
        let date = roc::parse_flexible(&raw.date).map_err(RowError::BadDate)?;

        let customer = raw.customer.trim();
        if customer.is_empty() {
            return Err(RowError::MissingCustomer);
        }

        let amount =
            parse_amount(&raw.amount).ok_or_else(|| RowError::BadAmount(raw.amount.clone()))?;
        let kind = PaymentKind::parse(&raw.kind)
            .ok_or_else(|| RowError::UnknownKind(raw.kind.clone()))?;

        let period = if raw.period.trim().is_empty() {
            AccountingPeriod::from_date(date).map_err(RowError::BadPeriod)?
        } else {
            AccountingPeriod::parse(&raw.period).map_err(RowError::BadPeriod)?
        };

        Ok(PaymentRecord {
            date,
            customer: customer.to_string(),
            amount,
            kind,
            responsible: raw.responsible.trim().to_string(),
            period,
            note: raw.note.trim().to_string(),
        })
    }
}

pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.2}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}
