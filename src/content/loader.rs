//! Content loader - loads posts and authors from the content directory

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Author, FrontMatter, PostInfo};
use crate::error::BuildError;
use crate::Site;

/// Author record as written in authors.yml
#[derive(Debug, Deserialize)]
struct AuthorEntry {
    id: String,
    name: String,
    #[serde(alias = "profileImg")]
    profile_img: String,
}

/// Result of a content load
#[derive(Debug, Default)]
pub struct LoadedPosts {
    /// Published posts, newest first
    pub posts: Vec<PostInfo>,
    /// Posts that could not be loaded, in walk order
    pub failures: Vec<BuildError>,
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load authors from content/authors.yml, keyed by id
    pub fn load_authors(&self) -> Result<HashMap<String, Author>> {
        let path = self.site.content_dir.join("authors.yml");
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&path)?;
        let entries: Vec<AuthorEntry> = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        Ok(entries
            .into_iter()
            .map(|e| {
                let author = Author {
                    profile_img: self.site.content_dir.join(&e.profile_img),
                    name: e.name,
                    id: e.id.clone(),
                };
                (e.id, author)
            })
            .collect())
    }

    /// Load all posts from content/posts.
    ///
    /// A post that fails to load is reported in `failures` under its
    /// path-derived slug; the others still load. Duplicate slugs fail the
    /// whole load.
    pub fn load_posts(&self) -> Result<LoadedPosts> {
        let posts_dir = self.site.content_dir.join("posts");
        if !posts_dir.exists() {
            return Ok(LoadedPosts::default());
        }

        let authors = self.load_authors()?;
        let mut posts: Vec<PostInfo> = Vec::new();
        let mut failures = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !(path.is_file() && is_markdown_file(path)) {
                continue;
            }

            match self.load_post(path, &authors) {
                Ok(Some(post)) => {
                    if let Some(existing) = posts.iter().find(|p| p.slug == post.slug) {
                        bail!(
                            "Duplicate slug `{}` in {:?} and {:?}",
                            post.slug,
                            existing.source,
                            post.source
                        );
                    }
                    posts.push(post);
                }
                Ok(None) => tracing::debug!("Skipping draft {:?}", path),
                Err(e) => {
                    tracing::error!("Failed to load post {:?}: {:#}", path, e);
                    let slug = slug_from_path(path)
                        .unwrap_or_else(|_| path.display().to_string());
                    failures.push(BuildError::new(
                        &slug,
                        e.context(format!("loading {:?}", path)),
                    ));
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.published.cmp(&a.published));

        Ok(LoadedPosts { posts, failures })
    }

    /// Load a single post from a file, `None` for drafts
    fn load_post(&self, path: &Path, authors: &HashMap<String, Author>) -> Result<Option<PostInfo>> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        if fm.draft {
            return Ok(None);
        }

        let file_modified = fs::metadata(path)?
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

        let published = fm
            .parse_published()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let slug = match fm.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => slug::slugify(s),
            _ => slug_from_path(path)?,
        };

        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        let post_authors = fm
            .authors
            .iter()
            .map(|id| {
                authors
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("Unknown author `{}`", id))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut post = PostInfo::new(&slug, &title, published, body);
        post.authors = post_authors;
        post.description = fm.description;
        post.tags = fm.tags;
        post.source = path.to_path_buf();

        Ok(Some(post))
    }
}

/// `posts/foo.md` and `posts/foo/index.md` both map to `foo`
fn slug_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Invalid file name {:?}", path))?;

    let name = if stem == "index" {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Cannot derive slug for {:?}", path))?
    } else {
        stem
    };

    Ok(name.to_string())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
