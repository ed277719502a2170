//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create `content/posts/<slug>/index.md` with a front-matter scaffold
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a slug from title {:?}", title);
    }

    let target_dir = site.content_dir.join("posts").join(&slug);
    let file_path = target_dir.join("index.md");

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&target_dir)?;

    let now = chrono::Local::now();
    let content = format!(
        "---\ntitle: {}\npublished: {}\nauthors: []\ndescription: \"\"\ntags: []\n---\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%dT%H:%M:%S%:z"),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
