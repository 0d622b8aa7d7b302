use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::roc;
use crate::usecase::ports::repo::{RepoError, UsageLog};

pub struct UsageService {
    log: Arc<dyn UsageLog>,
}

impl UsageService {
    pub fn new(log: Arc<dyn UsageLog>) -> Self {
        Self { log }
    }

    /// Days are keyed by the ROC display date; the caller owns the clock.
    pub fn record_open(&self, now: NaiveDateTime) -> Result<i64, RepoError> {
        let day = roc::to_display(now.date()).map_err(|err| RepoError::Message(err.to_string()))?;
        let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
        self.log.record_open(&day, &stamp)
    }
}
