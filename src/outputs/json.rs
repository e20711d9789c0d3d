//! JSON output of a [`Brief`].
//!
//! Serializes the brief (articles plus run statistics) for downstream
//! consumers.
//!
//! # Output Structure
//!
//! Files are organized by date:
//! ```text
//! json_output_dir/
//! └── 2025-11-11/
//!     ├── brief.json
//!     └── brief_debug.json
//! ```

use crate::models::Brief;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path the brief is written to: `{json_output_dir}/{date}/brief[_debug].json`.
pub fn brief_path(brief: &Brief, json_output_dir: &str) -> PathBuf {
    let filename = if brief.debug { "brief_debug.json" } else { "brief.json" };
    PathBuf::from(json_output_dir)
        .join(&brief.local_date)
        .join(filename)
}

/// Write a [`Brief`] to a JSON file with date-based directory structure.
///
/// Creates the date directory if needed. Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_brief(brief: &Brief, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(brief)?;
    let path = brief_path(brief, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = brief.articles.len(), "Wrote JSON brief");

    Ok(path)
}
