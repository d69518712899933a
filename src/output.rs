use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

/// Builds the output filename from the extracted name, falling back to a
/// generic stem when the name is absent.
pub fn markdown_filename(name: Option<&str>) -> String {
    let stem = name
        .unwrap_or("profile")
        .trim()
        .replace(' ', "_")
        .replace('/', "-");
    format!("{}_linkedin_profile.md", stem)
}

/// Writes the rendered Markdown under `dir` and returns the full path.
pub fn save_markdown(dir: &Path, filename: &str, markdown: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, markdown)?;
    info!("Markdown written to {:?}", path);
    Ok(path)
}
