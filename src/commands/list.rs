//! List posts

use anyhow::Result;

use crate::content::loader::{ContentLoader, LoadedPosts};
use crate::Site;

/// Print every published post, newest first, then any posts that failed to load
pub fn run(site: &Site) -> Result<()> {
    let loader = ContentLoader::new(site);
    let loaded = loader.load_posts()?;

    for line in listing(&loaded) {
        println!("{}", line);
    }

    Ok(())
}

fn listing(loaded: &LoadedPosts) -> Vec<String> {
    let mut lines = vec![format!("Posts ({}):", loaded.posts.len())];
    for post in &loaded.posts {
        let mut line = format!(
            "  {} - {} ({})",
            post.published.format("%Y-%m-%d"),
            post.title,
            post.slug
        );
        let authors = post.author_names();
        if !authors.is_empty() {
            line.push_str(" by ");
            line.push_str(&authors);
        }
        lines.push(line);
    }

    if !loaded.failures.is_empty() {
        lines.push(format!("Failed to load ({}):", loaded.failures.len()));
        for failure in &loaded.failures {
            lines.push(format!("  {}", failure));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_listing_newest_first_with_authors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/authors.yml", "- id: a\n  name: Ada\n  profile_img: a.png\n");
        write(
            dir.path(),
            "content/posts/old.md",
            "---\ntitle: Old\npublished: 2023-03-01\n---\nx\n",
        );
        write(
            dir.path(),
            "content/posts/new.md",
            "---\ntitle: New\npublished: 2024-03-01\nauthors: [a]\n---\nx\n",
        );
        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts().unwrap();

        assert_eq!(
            listing(&loaded),
            vec![
                "Posts (2):",
                "  2024-03-01 - New (new) by Ada",
                "  2023-03-01 - Old (old)",
            ]
        );
    }

    #[test]
    fn test_listing_shows_load_failures() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/posts/ghost.md", "---\ntitle: G\nauthors: [nobody]\n---\nx\n");
        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts().unwrap();

        let lines = listing(&loaded);
        assert_eq!(lines[0], "Posts (0):");
        assert_eq!(lines[1], "Failed to load (1):");
        assert!(lines[2].starts_with("  post `ghost`:"));
        assert!(lines[2].contains("nobody"));
    }
}
