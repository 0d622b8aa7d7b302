use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::payment::{PaymentKind, PaymentRecord};
use crate::domain::entities::query::SkippedRow;
use crate::usecase::ports::repo::SheetMeta;
use crate::RECENT_WINDOW_VALUE;

pub struct AppState {
    pub sheet: Signal<Option<SheetMeta>>,
    pub customer_filter: Signal<String>,
    pub period_choice: Signal<String>,
    pub records: Signal<Vec<PaymentRecord>>,
    pub skipped: Signal<Vec<SkippedRow>>,
    pub total_rows: Signal<usize>,
    pub amount_total: Signal<f64>,
    pub open_count: Signal<i64>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub show_entry_form: Signal<bool>,
    pub entry_date: Signal<String>,
    pub entry_customer: Signal<String>,
    pub entry_amount: Signal<String>,
    pub entry_kind: Signal<PaymentKind>,
    pub entry_responsible: Signal<String>,
    pub entry_period: Signal<String>,
    pub entry_note: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sheet: use_signal(|| None::<SheetMeta>),
            customer_filter: use_signal(String::new),
            period_choice: use_signal(|| RECENT_WINDOW_VALUE.to_string()),
            records: use_signal(Vec::<PaymentRecord>::new),
            skipped: use_signal(Vec::<SkippedRow>::new),
            total_rows: use_signal(|| 0_usize),
            amount_total: use_signal(|| 0.0_f64),
            open_count: use_signal(|| 0_i64),
            busy: use_signal(|| false),
            status: use_signal(|| "就緒".to_string()),
            show_entry_form: use_signal(|| false),
            entry_date: use_signal(String::new),
            entry_customer: use_signal(String::new),
            entry_amount: use_signal(String::new),
            entry_kind: use_signal(|| PaymentKind::Cash),
            entry_responsible: use_signal(String::new),
            entry_period: use_signal(String::new),
            entry_note: use_signal(String::new),
        }
    }
}
