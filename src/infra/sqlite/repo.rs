use std::path::PathBuf;

use crate::domain::entities::payment::RawPaymentRow;
use crate::infra::sqlite::queries::{
    append_payment, load_rows, record_open, replace_sheet_rows, sheet_meta,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{
    LedgerRepository, NewSheetMeta, RepoError, SheetMeta, UsageLog,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl LedgerRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(err.to_string()))
    }

    fn sheet_meta(&self) -> Result<Option<SheetMeta>, RepoError> {
        sheet_meta(&self.db_path).map_err(|err| RepoError::Message(err.to_string()))
    }

    fn load_rows(&self) -> Result<Vec<RawPaymentRow>, RepoError> {
        load_rows(&self.db_path).map_err(|err| RepoError::Message(err.to_string()))
    }

    fn replace_rows(&self, meta: NewSheetMeta, rows: &[RawPaymentRow]) -> Result<i64, RepoError> {
        replace_sheet_rows(&self.db_path, &meta.name, &meta.source_path, rows)
            .map_err(|err| RepoError::Message(err.to_string()))
    }

    fn append_row(&self, row: &RawPaymentRow) -> Result<(), RepoError> {
        append_payment(&self.db_path, row).map_err(|err| RepoError::Message(err.to_string()))
    }
}

impl UsageLog for SqliteRepo {
    fn record_open(&self, day: &str, stamp: &str) -> Result<i64, RepoError> {
        record_open(&self.db_path, day, stamp).map_err(|err| RepoError::Message(err.to_string()))
    }
}
