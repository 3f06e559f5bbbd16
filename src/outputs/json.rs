//! JSON export of the weekly report.
//!
//! ```json
//! {
//!   "site": "habr",
//!   "generated_at": "2018-03-14T20:30:00+03:00",
//!   "pages": 10,
//!   "weeks": [
//!     { "week_start": "28-12-2009", "week_end": "03-01-2010", "words": "закон инженерия" }
//!   ]
//! }
//! ```

use crate::models::{ProjectionRow, ReportProjection};
use crate::utils::ensure_writable_dir;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Top-level document written to disk.
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonReport {
    /// Site profile the crawl ran against.
    pub site: String,
    /// Local time the report was produced, RFC 3339.
    pub generated_at: String,
    /// Number of listing pages requested.
    pub pages: u32,
    /// One entry per week, in report order.
    pub weeks: Vec<ProjectionRow>,
}

impl JsonReport {
    pub fn new(site: &str, pages: u32, projection: &ReportProjection) -> Self {
        Self {
            site: site.to_string(),
            generated_at: Local::now().to_rfc3339(),
            pages,
            weeks: projection.rows(),
        }
    }
}

/// Write `report` as pretty JSON to `path`, creating parent directories.
///
/// # Arguments
///
/// * `report` - The report to serialize
/// * `path` - Destination file, overwritten if it exists
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation or
/// file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &JsonReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = ensure_writable_dir(parent).await {
            error!(dir = %parent.display(), error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    fs::write(path, json).await?;
    info!(weeks = report.weeks.len(), "Wrote JSON report");
    Ok(())
}
