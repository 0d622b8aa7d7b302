use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::import::csv::import_csv_to_ledger;
use crate::infra::import::xlsx::import_xlsx_to_ledger;
use crate::ImportReport;

pub struct ImportService {
    db_path: PathBuf,
}

impl ImportService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn import_csv(&self, path: &Path) -> Result<ImportReport> {
        import_csv_to_ledger(&self.db_path, path)
    }

    pub fn import_xlsx(&self, path: &Path) -> Result<ImportReport> {
        import_xlsx_to_ledger(&self.db_path, path)
    }
}
