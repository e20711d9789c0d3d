//! Output generation for JSON and Markdown briefs.
//!
//! # Submodules
//!
//! - [`json`]: Writes a `Brief` to JSON for downstream consumers
//! - [`markdown`]: Renders a `Brief` as Markdown for reading
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-11-11/
//!     ├── brief.json
//!     └── brief_debug.json
//!
//! markdown_output_dir/
//! ├── 2025-11-11_brief.md
//! └── 2025-11-11_brief_debug.md
//! ```

pub mod json;
pub mod markdown;

use crate::models::Brief;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Path the Markdown brief is written to.
pub fn markdown_path(brief: &Brief, markdown_output_dir: &str) -> PathBuf {
    let suffix = if brief.debug { "_debug" } else { "" };
    PathBuf::from(markdown_output_dir).join(format!("{}_brief{suffix}.md", brief.local_date))
}

/// Render and write the Markdown brief. Returns the path written.
#[instrument(level = "info", skip_all, fields(markdown_output_dir = %markdown_output_dir))]
pub async fn write_markdown(
    brief: &Brief,
    category_order: &[String],
    markdown_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let md = markdown::brief_to_markdown(brief, category_order);
    let path = markdown_path(brief, markdown_output_dir);
    tokio::fs::write(&path, md).await?;
    info!(path = %path.display(), "Wrote Markdown brief");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RunStats;

    fn brief(debug: bool) -> Brief {
        Brief {
            industry: "Healthcare".to_string(),
            local_date: "2025-11-11".to_string(),
            local_time: "07:30:00".to_string(),
            debug,
            articles: Vec::new(),
            stats: RunStats::default(),
        }
    }

    #[test]
    fn test_markdown_path() {
        assert_eq!(
            markdown_path(&brief(false), "/md"),
            PathBuf::from("/md/2025-11-11_brief.md")
        );
        assert_eq!(
            markdown_path(&brief(true), "/md"),
            PathBuf::from("/md/2025-11-11_brief_debug.md")
        );
    }

    #[tokio::test]
    async fn test_write_markdown() {
        let dir = std::env::temp_dir().join("health_news_brief_md_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let path = write_markdown(&brief(false), &[], dir.to_str().unwrap())
            .await
            .unwrap();
        let body = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(body.starts_with("# Healthcare News Brief"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
