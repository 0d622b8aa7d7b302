mod app;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use directories::ProjectDirs;

use crate::app::App;

/// Sentinel dropdown value for the default "current month plus trailing
/// three" query window.
pub const RECENT_WINDOW_VALUE: &str = "__recent__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub row_count: i64,
    /// Rows that will be skipped at query time until the sheet is fixed.
    pub flagged: usize,
}

fn main() {
    #[cfg(windows)]
    platform::desktop::console::detach_console();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Paylist"))
                .with_data_directory(webview_data_dir),
        )
        .launch(App);
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "paylist", "paylist")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("ledger.sqlite"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "paylist", "paylist")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    ensure_webview_data_dir(project_dirs.data_local_dir())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
