use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::domain::entities::payment::{PaymentKind, RawPaymentRow};
use crate::domain::entities::query::LedgerFilter;
use crate::domain::roc::AccountingPeriod;
use crate::domain::window::DateWindow;
use crate::infra::import::csv::import_csv_to_ledger;
use crate::infra::sqlite::queries::{load_rows, record_open, replace_sheet_rows, sheet_meta};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{LedgerRepository, NewSheetMeta};
use crate::usecase::services::entry_service::{EntryService, NewPayment};
use crate::usecase::services::query_service::QueryService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("paylist-{prefix}-{nanos}"))
}

fn sample_row(date: &str, customer: &str, amount: &str) -> RawPaymentRow {
    RawPaymentRow {
        date: date.to_string(),
        customer: customer.to_string(),
        amount: amount.to_string(),
        kind: "現金".to_string(),
        responsible: "陳主辦".to_string(),
        period: String::new(),
        note: String::new(),
    }
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('sheet','payment','usage_day','usage_stamp')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 4, "required tables should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn replace_and_load_round_trip_rows_in_order() {
    let temp_dir = unique_test_dir("replace-load");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");

    let rows = vec![
        sample_row("1130105", "大成五金", "1200"),
        sample_row("1130106", "永順水電", "800"),
        sample_row("1130107", "大成印刷", "650"),
    ];

    let repo = SqliteRepo {
        db_path: db_path.clone(),
    };
    let count = repo
        .replace_rows(
            NewSheetMeta {
                name: "付款明細".to_string(),
                source_path: "paylist.csv".to_string(),
            },
            &rows,
        )
        .expect("replace should succeed");
    assert_eq!(count, 3);

    let loaded = load_rows(&db_path).expect("load should succeed");
    assert_eq!(loaded, rows, "rows should round trip verbatim and in order");

    // a second import replaces, never appends
    let replacement = vec![sample_row("1130201", "大成五金", "400")];
    replace_sheet_rows(&db_path, "付款明細", "paylist.csv", &replacement)
        .expect("second replace should succeed");
    let reloaded = load_rows(&db_path).expect("reload should succeed");
    assert_eq!(reloaded, replacement);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn appended_entry_is_stored_compact_and_found_by_query() {
    let temp_dir = unique_test_dir("append-query");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");

    init_db(&db_path).expect("init_db should succeed");

    let repo = Arc::new(SqliteRepo {
        db_path: db_path.clone(),
    });
    let entry_service = EntryService::new(repo.clone());
    let row = entry_service
        .append(&NewPayment {
            date: "113/01/05".to_string(),
            customer: "大成五金".to_string(),
            amount: "1,200".to_string(),
            kind: PaymentKind::Check,
            responsible: "陳主辦".to_string(),
            period: None,
            note: "月結".to_string(),
        })
        .expect("append should succeed");

    assert_eq!(row.date, "1130105", "date should be stored in compact form");
    assert_eq!(row.period, "113/01", "period should default to the date's month");

    let stored = load_rows(&db_path).expect("load should succeed");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], row);

    let period = AccountingPeriod::parse("113/01").expect("period should parse");
    let view = QueryService::new(repo)
        .search(&LedgerFilter {
            customer: "大成".to_string(),
            window: Some(DateWindow::for_period(period)),
        })
        .expect("search should succeed");

    assert_eq!(view.records.len(), 1);
    assert_eq!(view.records[0].amount, 1200.0);
    assert_eq!(view.records[0].kind, PaymentKind::Check);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn query_service_reports_skipped_rows_instead_of_failing() {
    let temp_dir = unique_test_dir("skip-rows");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");

    let mut bad_date = sample_row("改天再記", "永順水電", "800");
    bad_date.period = "113/01".to_string();
    let rows = vec![
        sample_row("1130105", "大成五金", "1200"),
        bad_date,
        sample_row("1130107", "大成印刷", "650"),
    ];
    replace_sheet_rows(&db_path, "付款明細", "paylist.csv", &rows)
        .expect("replace should succeed");

    let view = QueryService::new(Arc::new(SqliteRepo {
        db_path: db_path.clone(),
    }))
    .search(&LedgerFilter::default())
    .expect("search should succeed despite the bad row");

    assert_eq!(view.records.len(), 2);
    assert_eq!(view.total_rows, 3);
    assert_eq!(view.skipped.len(), 1);
    assert_eq!(view.skipped[0].row_idx, 1);
    assert!(
        view.skipped[0].reason.contains("date"),
        "reason should name the bad column: {}",
        view.skipped[0].reason
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn usage_counter_increments_within_a_day_and_stamps_every_open() {
    let temp_dir = unique_test_dir("usage-log");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");

    let first = record_open(&db_path, "115/08/07", "2026-08-07 09:00:00")
        .expect("first open should record");
    let second = record_open(&db_path, "115/08/07", "2026-08-07 13:30:00")
        .expect("second open should record");
    let other_day = record_open(&db_path, "115/08/08", "2026-08-08 08:15:00")
        .expect("next day should record");

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(other_day, 1, "counter is keyed per day");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let stamps: i64 = conn
        .query_row("SELECT COUNT(*) FROM usage_stamp", [], |row| row.get(0))
        .expect("stamp count query should succeed");
    assert_eq!(stamps, 3, "every open should leave a timestamp");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_maps_chinese_headers_and_flags_bad_rows() {
    let temp_dir = unique_test_dir("import-csv");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");
    let csv_path = temp_dir.join("付款明細.csv");
    fs::write(
        &csv_path,
        "日期,客戶名稱,金額,型式,負責人員,帳款月份,備註\n\
         1130105,大成五金,1200,現金,陳主辦,113/01,\n\
         113/01/20,永順水電,800,支票,,,月結\n\
         改天再記,大成印刷,650,現金,,,\n",
    )
    .expect("should write csv fixture");

    let report = import_csv_to_ledger(&db_path, &csv_path).expect("import should succeed");
    assert_eq!(report.row_count, 3);
    assert_eq!(report.flagged, 1, "the unparseable date row should be flagged");

    let meta = sheet_meta(&db_path)
        .expect("meta query should succeed")
        .expect("sheet record should exist");
    assert_eq!(meta.name, "付款明細");
    assert_eq!(meta.row_count, 3);

    let rows = load_rows(&db_path).expect("load should succeed");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].customer, "大成五金");
    assert_eq!(rows[1].note, "月結");
    assert_eq!(rows[2].date, "改天再記", "bad rows are mirrored verbatim");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_accepts_english_header_aliases() {
    let temp_dir = unique_test_dir("import-csv-en");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");
    let csv_path = temp_dir.join("payments.csv");
    fs::write(
        &csv_path,
        "Date,CustomerName,Amount,Type\n2024-01-05,大成五金,1200,cash\n",
    )
    .expect("should write csv fixture");

    let report = import_csv_to_ledger(&db_path, &csv_path).expect("import should succeed");
    assert_eq!(report.row_count, 1);
    assert_eq!(report.flagged, 0);

    let rows = load_rows(&db_path).expect("load should succeed");
    assert_eq!(rows[0].date, "2024-01-05");
    assert_eq!(rows[0].responsible, "", "absent optional columns default to empty");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_rejects_files_missing_required_columns() {
    let temp_dir = unique_test_dir("import-csv-bad");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("ledger.sqlite");
    let csv_path = temp_dir.join("not-a-ledger.csv");
    fs::write(&csv_path, "name,city\nAlice,Paris\n").expect("should write csv fixture");

    let err = import_csv_to_ledger(&db_path, &csv_path)
        .expect_err("import without a date column should fail");
    assert!(err.to_string().contains("日期"), "got: {err}");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}
