use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use dioxus::prelude::*;
use rfd::FileDialog;

use crate::domain::entities::payment::{format_amount, PaymentKind, PaymentRecord};
use crate::domain::entities::query::{LedgerFilter, LedgerView, SkippedRow};
use crate::domain::roc::{self, AccountingPeriod};
use crate::domain::window::{DateWindow, DEFAULT_TRAILING_MONTHS};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::repo::LedgerRepository;
use crate::usecase::services::entry_service::{EntryService, NewPayment};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::usage_service::UsageService;
use crate::{default_db_path, now_local, today, RECENT_WINDOW_VALUE};

// how many accounting periods the dropdown offers
const PERIOD_CHOICES: u32 = 12;

fn window_for_choice(choice: &str, as_of: NaiveDate) -> Result<DateWindow, String> {
    if choice == RECENT_WINDOW_VALUE {
        return Ok(DateWindow::rolling(as_of, DEFAULT_TRAILING_MONTHS));
    }
    AccountingPeriod::parse(choice)
        .map(DateWindow::for_period)
        .map_err(|err| err.to_string())
}

fn run_search(db_path: &Path, customer: &str, choice: &str) -> Result<LedgerView, String> {
    let window = window_for_choice(choice, today())?;
    let repo = Arc::new(SqliteRepo {
        db_path: db_path.to_path_buf(),
    });
    QueryService::new(repo)
        .search(&LedgerFilter {
            customer: customer.to_string(),
            window: Some(window),
        })
        .map_err(|err| err.to_string())
}

fn apply_view(
    view: LedgerView,
    mut records: Signal<Vec<PaymentRecord>>,
    mut skipped: Signal<Vec<SkippedRow>>,
    mut total_rows: Signal<usize>,
    mut amount_total: Signal<f64>,
) {
    *amount_total.write() = view.amount_total;
    *total_rows.write() = view.total_rows;
    *skipped.write() = view.skipped;
    *records.write() = view.records;
}

fn search_status(matched: usize, amount_total: f64, skipped: usize) -> String {
    if skipped > 0 {
        format!(
            "查詢完成，共 {} 筆，合計 {}（{} 筆資料無法解析，已略過）",
            matched,
            format_amount(amount_total),
            skipped
        )
    } else {
        format!("查詢完成，共 {} 筆，合計 {}", matched, format_amount(amount_total))
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match default_db_path() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div {
                    p { "無法取得資料庫路徑：{err}" }
                }
            };
        }
    };
    let db_path = Arc::new(db_path);

    let AppState {
        mut sheet,
        mut customer_filter,
        mut period_choice,
        records,
        skipped,
        total_rows,
        amount_total,
        mut open_count,
        mut busy,
        mut status,
        mut show_entry_form,
        mut entry_date,
        mut entry_customer,
        mut entry_amount,
        mut entry_kind,
        mut entry_responsible,
        mut entry_period,
        mut entry_note,
    } = AppState::new();

    let as_of = today();
    let period_options: Vec<String> = roc::recent_periods(as_of, PERIOD_CHOICES)
        .map(|periods| periods.map(|period| period.label()).collect())
        .unwrap_or_default();

    let db_path_for_init = db_path.clone();
    use_effect(move || {
        *busy.write() = true;
        let repo = Arc::new(SqliteRepo {
            db_path: db_path_for_init.as_ref().clone(),
        });

        let init_result = run_blocking(|| {
            repo.init()?;
            UsageService::new(repo.clone()).record_open(now_local())
        });
        match init_result {
            Ok(count) => {
                *open_count.write() = count;
                *status.write() = format!("就緒（今日第 {count} 次開啟）");
            }
            Err(err) => {
                *status.write() = format!("初始化資料庫失敗：{err}");
            }
        }

        match run_blocking(|| repo.sheet_meta()) {
            Ok(meta) => {
                *sheet.write() = meta;
            }
            Err(err) => {
                *status.write() = format!("讀取帳冊資訊失敗：{err}");
            }
        }

        // initial load always uses the defaults; reading the filter signals
        // here would re-run the effect on every keystroke
        match run_blocking(|| run_search(&db_path_for_init, "", RECENT_WINDOW_VALUE)) {
            Ok(view) => {
                apply_view(view, records, skipped, total_rows, amount_total);
            }
            Err(err) => {
                *status.write() = format!("載入資料失敗：{err}");
            }
        }

        *busy.write() = false;
    });

    let db_path_for_import = db_path.clone();
    let db_path_for_customer = db_path.clone();
    let db_path_for_period = db_path.clone();
    let db_path_for_requery = db_path.clone();
    let db_path_for_entry = db_path.clone();

    let matched = records().len();
    let skipped_lines: Vec<String> = skipped()
        .iter()
        .map(|item| format!("第 {} 列：{}", item.row_idx + 1, item.reason))
        .collect();
    let display_rows: Vec<Vec<String>> = records()
        .iter()
        .map(|record| {
            vec![
                roc::to_display(record.date).unwrap_or_else(|_| record.date.to_string()),
                record.customer.clone(),
                format_amount(record.amount),
                record.kind.as_str().to_string(),
                record.responsible.clone(),
                record.period.label(),
                record.note.clone(),
            ]
        })
        .collect();
    let summary_line = format!(
        "符合 {matched} 筆／全部 {} 筆，合計 {}",
        total_rows(),
        format_amount(amount_total())
    );
    let sheet_line = match sheet() {
        Some(meta) => format!(
            "目前帳冊:{}（{} 筆，來源 {}，匯入於 {}）",
            meta.name, meta.row_count, meta.source_path, meta.imported_at
        ),
        None => "尚未匯入帳冊".to_string(),
    };

    rsx! {
        div {
            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }

                        let Some(file_path) = FileDialog::new()
                            .add_filter("帳冊檔", &["csv", "xlsx"])
                            .pick_file() else {
                            *status.write() = "已取消匯入".to_string();
                            return;
                        };

                        *busy.write() = true;
                        *status.write() = format!("正在匯入 {}", file_path.display());

                        let ext = file_path
                            .extension()
                            .and_then(|e| e.to_str())
                            .map(|s| s.to_ascii_lowercase())
                            .unwrap_or_default();

                        let service = ImportService::new(db_path_for_import.as_ref().clone());
                        let import_result = run_blocking(|| {
                            if ext == "xlsx" {
                                service.import_xlsx(&file_path)
                            } else {
                                service.import_csv(&file_path)
                            }
                        });

                        match import_result {
                            Ok(report) => {
                                let repo = SqliteRepo {
                                    db_path: db_path_for_import.as_ref().clone(),
                                };
                                if let Ok(meta) = repo.sheet_meta() {
                                    *sheet.write() = meta;
                                }

                                match run_search(
                                    &db_path_for_import,
                                    &customer_filter(),
                                    &period_choice(),
                                ) {
                                    Ok(view) => {
                                        apply_view(view, records, skipped, total_rows, amount_total);
                                        *status.write() = if report.flagged > 0 {
                                            format!(
                                                "已匯入 {} 筆（{} 筆資料待修正）",
                                                report.row_count, report.flagged
                                            )
                                        } else {
                                            format!("已匯入 {} 筆", report.row_count)
                                        };
                                    }
                                    Err(err) => {
                                        *status.write() = format!("匯入成功，但載入資料失敗：{err}");
                                    }
                                }
                            }
                            Err(err) => {
                                *status.write() = format!("匯入失敗：{err}");
                            }
                        }

                        *busy.write() = false;
                    },
                    "匯入帳冊"
                }

                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let next = !show_entry_form();
                        *show_entry_form.write() = next;
                        if next && entry_date().is_empty() {
                            if let Ok(text) = roc::to_display(today()) {
                                *entry_date.write() = text;
                            }
                        }
                    },
                    if show_entry_form() { "收起新增" } else { "新增付款" }
                }

                span { " {status}" }
            }

            div {
                label { "客戶名稱 " }
                input {
                    disabled: busy(),
                    value: customer_filter(),
                    placeholder: "輸入客戶名稱關鍵字",
                    onchange: move |event| {
                        let next_customer = event.value();
                        *customer_filter.write() = next_customer.clone();
                        *busy.write() = true;

                        match run_search(&db_path_for_customer, &next_customer, &period_choice()) {
                            Ok(view) => {
                                let line = search_status(
                                    view.records.len(),
                                    view.amount_total,
                                    view.skipped.len(),
                                );
                                apply_view(view, records, skipped, total_rows, amount_total);
                                *status.write() = line;
                            }
                            Err(err) => {
                                *status.write() = format!("查詢失敗：{err}");
                            }
                        }

                        *busy.write() = false;
                    },
                }

                label { "帳款月份 " }
                select {
                    disabled: busy(),
                    value: period_choice(),
                    onchange: move |event| {
                        let next_choice = event.value();
                        *period_choice.write() = next_choice.clone();
                        *busy.write() = true;

                        match run_search(&db_path_for_period, &customer_filter(), &next_choice) {
                            Ok(view) => {
                                let line = search_status(
                                    view.records.len(),
                                    view.amount_total,
                                    view.skipped.len(),
                                );
                                apply_view(view, records, skipped, total_rows, amount_total);
                                *status.write() = line;
                            }
                            Err(err) => {
                                *status.write() = format!("查詢失敗：{err}");
                            }
                        }

                        *busy.write() = false;
                    },
                    option { value: "{RECENT_WINDOW_VALUE}", "近四個月（含本月）" }
                    for label in period_options.clone() {
                        option { value: "{label}", "{label}" }
                    }
                }

                button {
                    disabled: busy(),
                    onclick: move |_| {
                        *busy.write() = true;

                        match run_search(&db_path_for_requery, &customer_filter(), &period_choice()) {
                            Ok(view) => {
                                let line = search_status(
                                    view.records.len(),
                                    view.amount_total,
                                    view.skipped.len(),
                                );
                                apply_view(view, records, skipped, total_rows, amount_total);
                                *status.write() = line;
                            }
                            Err(err) => {
                                *status.write() = format!("查詢失敗：{err}");
                            }
                        }

                        *busy.write() = false;
                    },
                    "查詢"
                }
            }

            if show_entry_form() {
                div {
                    style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                    label { "日期 " }
                    input {
                        disabled: busy(),
                        value: entry_date(),
                        placeholder: "113/01/05",
                        onchange: move |event| {
                            *entry_date.write() = event.value();
                        },
                    }
                    label { "客戶 " }
                    input {
                        disabled: busy(),
                        value: entry_customer(),
                        onchange: move |event| {
                            *entry_customer.write() = event.value();
                        },
                    }
                    label { "金額 " }
                    input {
                        disabled: busy(),
                        value: entry_amount(),
                        onchange: move |event| {
                            *entry_amount.write() = event.value();
                        },
                    }
                    label { "型式 " }
                    select {
                        disabled: busy(),
                        value: entry_kind().as_str(),
                        onchange: move |event| {
                            if let Some(kind) = PaymentKind::parse(&event.value()) {
                                *entry_kind.write() = kind;
                            }
                        },
                        for label in PaymentKind::ALL.map(|kind| kind.as_str()) {
                            option { value: "{label}", "{label}" }
                        }
                    }
                    label { "負責人員 " }
                    input {
                        disabled: busy(),
                        value: entry_responsible(),
                        onchange: move |event| {
                            *entry_responsible.write() = event.value();
                        },
                    }
                    label { "帳款月份 " }
                    input {
                        disabled: busy(),
                        value: entry_period(),
                        placeholder: "空白則依日期",
                        onchange: move |event| {
                            *entry_period.write() = event.value();
                        },
                    }
                    label { "備註 " }
                    input {
                        disabled: busy(),
                        value: entry_note(),
                        onchange: move |event| {
                            *entry_note.write() = event.value();
                        },
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            if busy() {
                                return;
                            }
                            *busy.write() = true;

                            let period_text = entry_period();
                            let period = if period_text.trim().is_empty() {
                                None
                            } else {
                                match AccountingPeriod::parse(&period_text) {
                                    Ok(period) => Some(period),
                                    Err(err) => {
                                        *status.write() = format!("帳款月份格式錯誤：{err}");
                                        *busy.write() = false;
                                        return;
                                    }
                                }
                            };

                            let entry = NewPayment {
                                date: entry_date(),
                                customer: entry_customer(),
                                amount: entry_amount(),
                                kind: entry_kind(),
                                responsible: entry_responsible(),
                                period,
                                note: entry_note(),
                            };

                            let repo = Arc::new(SqliteRepo {
                                db_path: db_path_for_entry.as_ref().clone(),
                            });
                            let append_result =
                                run_blocking(|| EntryService::new(repo.clone()).append(&entry));

                            match append_result {
                                Ok(row) => {
                                    *entry_customer.write() = String::new();
                                    *entry_amount.write() = String::new();
                                    *entry_note.write() = String::new();

                                    if let Ok(meta) = repo.sheet_meta() {
                                        *sheet.write() = meta;
                                    }

                                    match run_search(
                                        &db_path_for_entry,
                                        &customer_filter(),
                                        &period_choice(),
                                    ) {
                                        Ok(view) => {
                                            apply_view(
                                                view,
                                                records,
                                                skipped,
                                                total_rows,
                                                amount_total,
                                            );
                                            *status.write() = format!(
                                                "已新增付款紀錄：{}（{} 元）",
                                                row.customer, row.amount
                                            );
                                        }
                                        Err(err) => {
                                            *status.write() =
                                                format!("新增成功，但重新查詢失敗：{err}");
                                        }
                                    }
                                }
                                Err(err) => {
                                    *status.write() = format!("新增付款失敗：{err}");
                                }
                            }

                            *busy.write() = false;
                        },
                        "送出"
                    }
                }
            }

            div {
                span { "{sheet_line}" }
            }

            div {
                span { "{summary_line}" }
            }

            if !skipped_lines.is_empty() {
                ul {
                    for line in skipped_lines.clone() {
                        li { "{line}" }
                    }
                }
            }

            table { style: "border-collapse: collapse; width: 100%; border: 1px solid #bbb;",
                thead {
                    tr {
                        for header in ["日期", "客戶名稱", "金額", "型式", "負責人員", "帳款月份", "備註"] {
                            th { style: "border: 1px solid #bbb; padding: 6px; background: #f2f2f2;", "{header}" }
                        }
                    }
                }
                tbody {
                    if display_rows.is_empty() {
                        tr {
                            td { style: "border: 1px solid #bbb; padding: 6px;",
                                colspan: 7,
                                "無資料"
                            }
                        }
                    } else {
                        for row in display_rows {
                            tr {
                                for cell in row {
                                    td { style: "border: 1px solid #bbb; padding: 6px;", "{cell}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
