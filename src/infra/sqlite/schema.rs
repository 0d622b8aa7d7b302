use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sheet (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            source_path TEXT NOT NULL,
            row_count   INTEGER NOT NULL,
            imported_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS payment (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            row_idx     INTEGER NOT NULL,
            pay_date    TEXT NOT NULL,
            customer    TEXT NOT NULL,
            amount      TEXT NOT NULL,
            kind        TEXT NOT NULL,
            responsible TEXT NOT NULL,
            period      TEXT NOT NULL,
            note        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS usage_day (
            day         TEXT PRIMARY KEY,
            open_count  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS usage_stamp (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            stamped_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_payment_row
            ON payment(row_idx);

        CREATE INDEX IF NOT EXISTS idx_payment_customer
            ON payment(customer);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
