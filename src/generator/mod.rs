//! Generator module - writes site pages and social preview documents

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use crate::content::{list_view, PostInfo};
use crate::error::BuildError;
use crate::pages::{social_image_path, PageRenderer};
use crate::preview::{PreviewRenderer, Rasterizer};
use crate::Site;

/// Outcome of a site build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Posts whose page and preview were written
    pub built: Vec<String>,
    /// Per-post failures, in build order
    pub failures: Vec<BuildError>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Static site generator
pub struct Generator<'a> {
    site: &'a Site,
    pages: PageRenderer,
    previews: PreviewRenderer,
    rasterizer: Option<Box<dyn Rasterizer>>,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(
        site: &'a Site,
        previews: PreviewRenderer,
        rasterizer: Option<Box<dyn Rasterizer>>,
    ) -> Result<Self> {
        Ok(Self {
            site,
            pages: PageRenderer::new(&site.config)?,
            previews,
            rasterizer,
        })
    }

    /// Generate the index, every post page and every preview.
    ///
    /// A failing post is recorded in the report and does not stop the others.
    pub fn generate(&self, posts: &[PostInfo]) -> Result<BuildReport> {
        fs::create_dir_all(&self.site.public_dir)?;

        let index = self.pages.render_index(&list_view(posts))?;
        write_file(&self.site.public_dir.join("index.html"), &index)?;

        let mut report = BuildReport::default();
        for post in posts {
            match self.generate_post(post) {
                Ok(()) => report.built.push(post.slug.clone()),
                Err(e) => {
                    tracing::error!("Failed to build {}: {:#}", post.slug, e);
                    report.failures.push(BuildError::new(&post.slug, e));
                }
            }
        }

        Ok(report)
    }

    /// Build the page and preview for one post
    pub fn generate_post(&self, post: &PostInfo) -> Result<()> {
        let page = self.pages.render_post(post)?;
        let page_path = self
            .site
            .public_dir
            .join("posts")
            .join(&post.slug)
            .join("index.html");
        write_file(&page_path, &page)?;

        let document = self.previews.render(post)?;
        let image_path = self.site.public_dir.join(social_image_path(&post.slug));
        write_file(&image_path.with_extension("html"), &document)?;

        if let Some(rasterizer) = &self.rasterizer {
            let (width, height) = self.previews.dimensions();
            let png = rasterizer.rasterize(&document, width, height)?;
            write_file(&image_path, &png)?;
        }

        tracing::debug!("Generated post: {}", post.slug);
        Ok(())
    }
}

fn write_file<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    struct FakeRasterizer;

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&self, html: &str, width: u32, height: u32) -> Result<Vec<u8>, PreviewError> {
            Ok(format!("{}x{}:{}", width, height, html.len()).into_bytes())
        }
    }

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("styles")).unwrap();
        fs::create_dir_all(assets.join("social-previews")).unwrap();
        fs::write(assets.join("styles/code.css"), "pre{}").unwrap();
        fs::write(assets.join("social-previews/twitter-large-card.css"), ".card{}").unwrap();
        fs::write(assets.join("unicorn_head_1024.png"), b"\x89PNG").unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    fn post(slug: &str, content: &str) -> PostInfo {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PostInfo::new(slug, slug, date, content)
    }

    #[test]
    fn test_failing_post_does_not_stop_others() {
        let (_dir, site) = site();
        let previews = PreviewRenderer::for_site(&site).unwrap();
        let generator = Generator::new(&site, previews, Some(Box::new(FakeRasterizer))).unwrap();

        let posts = vec![
            post("good", "```js\nconsole.log(1)\n```"),
            post("broken", "```js\nnever closed"),
            post("also-good", "No code."),
        ];
        let report = generator.generate(&posts).unwrap();

        assert_eq!(report.built, vec!["good", "also-good"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slug, "broken");
        assert!(!report.is_success());

        let public = &site.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("posts/good/index.html").exists());
        assert!(public.join("social-previews/good.html").exists());
        assert!(public.join("social-previews/also-good.png").exists());
        assert!(!public.join("social-previews/broken.html").exists());

        let png = fs::read_to_string(public.join("social-previews/good.png")).unwrap();
        assert!(png.starts_with("1280x640:"));
    }

    #[test]
    fn test_without_rasterizer_writes_documents_only() {
        let (_dir, site) = site();
        let previews = PreviewRenderer::for_site(&site).unwrap();
        let generator = Generator::new(&site, previews, None).unwrap();

        let report = generator.generate(&[post("solo", "text")]).unwrap();
        assert!(report.is_success());
        assert!(site.public_dir.join("social-previews/solo.html").exists());
        assert!(!site.public_dir.join("social-previews/solo.png").exists());
    }
}
