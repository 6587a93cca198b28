pub mod summary;
pub mod window;

pub use summary::{aggregate, format_hours, generate_summary, Summary};
pub use window::SummaryWindow;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Write a rendered summary to `path`, returning the path written
pub fn save_summary(path: &Path, text: &str) -> Result<PathBuf> {
    let mut content = text.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    crate::store::atomic_write(path, &content)?;
    Ok(path.to_path_buf())
}
