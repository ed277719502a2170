//! Render one post's social preview document

use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

use crate::content::loader::ContentLoader;
use crate::preview::PreviewRenderer;
use crate::Site;

/// Render the preview for `slug`
pub fn render(site: &Site, slug: &str) -> Result<String> {
    let loader = ContentLoader::new(site);
    let loaded = loader.load_posts()?;
    if let Some(failure) = loaded.failures.into_iter().find(|f| f.slug == slug) {
        return Err(failure.into());
    }
    let post = loaded
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| anyhow!("No post with slug `{}`", slug))?;

    let renderer = PreviewRenderer::for_site(site)?;
    Ok(renderer.render(post)?)
}

/// Render the preview and write it to `output`, or stdout when unset
pub fn run(site: &Site, slug: &str, output: Option<&Path>) -> Result<()> {
    let document = render(site, slug)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, document)?;
            tracing::info!("Wrote preview for {} to {:?}", slug, path);
        }
        None => println!("{}", document),
    }

    Ok(())
}
