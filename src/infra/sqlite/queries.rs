use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::domain::entities::payment::RawPaymentRow;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::SheetMeta;

/// Replaces the whole mirror with a fresh copy of the sheet. The mirror
/// always reflects exactly one workbook sheet, so old rows go first.
pub fn replace_sheet_rows(
    db_path: &Path,
    name: &str,
    source_path: &str,
    rows: &[RawPaymentRow],
) -> Result<i64> {
    init_db(db_path)?;

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start import transaction")?;

    tx.execute("DELETE FROM payment", [])
        .context("failed to clear previous rows")?;
    tx.execute("DELETE FROM sheet", [])
        .context("failed to clear previous sheet record")?;

    tx.execute(
        "INSERT INTO sheet(name, source_path, row_count) VALUES (?1, ?2, ?3)",
        params![name, source_path, rows.len() as i64],
    )
    .context("failed to insert sheet record")?;

    let mut insert_row = tx
        .prepare(
            "INSERT INTO payment(row_idx, pay_date, customer, amount, kind, responsible, period, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .context("failed to prepare payment insert")?;

    for (row_idx, row) in rows.iter().enumerate() {
        insert_row
            .execute(params![
                row_idx as i64,
                row.date,
                row.customer,
                row.amount,
                row.kind,
                row.responsible,
                row.period,
                row.note
            ])
            .context("failed to insert payment row")?;
    }
    drop(insert_row);

    tx.commit().context("failed to commit import transaction")?;

    Ok(rows.len() as i64)
}

pub fn load_rows(db_path: &Path) -> Result<Vec<RawPaymentRow>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT pay_date, customer, amount, kind, responsible, period, note
             FROM payment
             ORDER BY row_idx ASC, id ASC",
        )
        .context("failed to prepare payment query")?;

    let row_iter = stmt
        .query_map([], |row| {
            Ok(RawPaymentRow {
                date: row.get(0)?,
                customer: row.get(1)?,
                amount: row.get(2)?,
                kind: row.get(3)?,
                responsible: row.get(4)?,
                period: row.get(5)?,
                note: row.get(6)?,
            })
        })
        .context("failed to query payment rows")?;

    let mut rows = Vec::new();
    for item in row_iter {
        rows.push(item.context("failed to read payment row")?);
    }
    Ok(rows)
}

pub fn append_payment(db_path: &Path, row: &RawPaymentRow) -> Result<()> {
    init_db(db_path)?;

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start append transaction")?;

    let next_idx: i64 = tx
        .query_row("SELECT COALESCE(MAX(row_idx) + 1, 0) FROM payment", [], |r| {
            r.get(0)
        })
        .context("failed to compute next row index")?;

    tx.execute(
        "INSERT INTO payment(row_idx, pay_date, customer, amount, kind, responsible, period, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            next_idx,
            row.date,
            row.customer,
            row.amount,
            row.kind,
            row.responsible,
            row.period,
            row.note
        ],
    )
    .context("failed to insert appended payment")?;

    // keeps the provenance row honest; a no-op before the first import
    tx.execute("UPDATE sheet SET row_count = row_count + 1", [])
        .context("failed to bump sheet row count")?;

    tx.commit().context("failed to commit append transaction")?;
    Ok(())
}

pub fn sheet_meta(db_path: &Path) -> Result<Option<SheetMeta>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT name, source_path, row_count, imported_at
         FROM sheet
         ORDER BY id DESC
         LIMIT 1",
        [],
        |row| {
            Ok(SheetMeta {
                name: row.get(0)?,
                source_path: row.get(1)?,
                row_count: row.get(2)?,
                imported_at: row.get(3)?,
            })
        },
    )
    .optional()
    .context("failed to query sheet record")
}

pub fn record_open(db_path: &Path, day: &str, stamp: &str) -> Result<i64> {
    // usage is recorded at launch, before any import has created the db
    init_db(db_path)?;

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start usage transaction")?;

    tx.execute(
        "INSERT INTO usage_day(day, open_count) VALUES (?1, 1)
         ON CONFLICT(day) DO UPDATE SET open_count = open_count + 1",
        params![day],
    )
    .context("failed to bump usage counter")?;

    tx.execute(
        "INSERT INTO usage_stamp(stamped_at) VALUES (?1)",
        params![stamp],
    )
    .context("failed to insert usage stamp")?;

    let count: i64 = tx
        .query_row(
            "SELECT open_count FROM usage_day WHERE day = ?1",
            params![day],
            |r| r.get(0),
        )
        .context("failed to read usage counter")?;

    tx.commit().context("failed to commit usage update")?;
    Ok(count)
}
