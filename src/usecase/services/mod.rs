pub mod entry_service;
pub mod import_service;
pub mod query_service;
pub mod usage_service;
