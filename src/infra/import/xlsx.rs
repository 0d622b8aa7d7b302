use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::domain::entities::payment::RawPaymentRow;
use crate::infra::import::columns::{flagged_row_count, ColumnMap};
use crate::infra::sqlite::queries::replace_sheet_rows;
use crate::ImportReport;

const PREFERRED_SHEET: &str = "付款明細";

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        // date cells arrive as serial numbers; render the civil date so the
        // flexible parser can read it back
        Data::DateTime(v) => v
            .as_datetime()
            .map(|stamp| stamp.date().to_string())
            .unwrap_or_else(|| v.to_string()),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

pub fn import_xlsx_to_ledger(db_path: &Path, xlsx_path: &Path) -> Result<ImportReport> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;

    let sheet_name = if workbook
        .sheet_names()
        .iter()
        .any(|name| name == PREFERRED_SHEET)
    {
        PREFERRED_SHEET.to_string()
    } else {
        workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("workbook has no sheets: {}", xlsx_path.display()))?
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| anyhow!("sheet has no header row: {sheet_name}"))?
        .iter()
        .map(cell_to_string)
        .collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let rows: Vec<RawPaymentRow> = sheet_rows
        .map(|row| {
            let cells: Vec<String> = row.iter().map(cell_to_string).collect();
            columns.row_from_cells(&cells)
        })
        .collect();

    let source_path = format!("{}#{sheet_name}", xlsx_path.to_string_lossy());
    let row_count = replace_sheet_rows(db_path, &sheet_name, &source_path, &rows)?;

    Ok(ImportReport {
        row_count,
        flagged: flagged_row_count(&rows),
    })
}
