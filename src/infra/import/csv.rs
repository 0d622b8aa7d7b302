use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::import::columns::{flagged_row_count, ColumnMap};
use crate::infra::sqlite::queries::replace_sheet_rows;
use crate::ImportReport;

pub fn import_csv_to_ledger(db_path: &Path, csv_path: &Path) -> Result<ImportReport> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(|name| name.to_string())
        .collect();

    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let cells: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        rows.push(columns.row_from_cells(&cells));
    }

    let sheet_name = csv_path
        .file_stem()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("付款明細")
        .to_string();
    let source_path = csv_path.to_string_lossy().into_owned();

    let row_count = replace_sheet_rows(db_path, &sheet_name, &source_path, &rows)?;

    Ok(ImportReport {
        row_count,
        flagged: flagged_row_count(&rows),
    })
}
