//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the generated output
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(site.public_dir.join("posts")).unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());
        // Cleaning twice is fine
        run(&site).unwrap();
    }
}
