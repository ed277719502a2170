//! Post models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A post author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Key used by post front-matter
    pub id: String,

    /// Display name
    pub name: String,

    /// Profile image, absolute once loaded
    pub profile_img: PathBuf,
}

/// A blog post as loaded from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInfo {
    /// Unique URL-friendly identifier
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub published: DateTime<Local>,

    /// Raw markdown content (front-matter stripped)
    pub content: String,

    /// Authors in front-matter order
    pub authors: Vec<Author>,

    /// Short summary for cards and listings
    pub description: Option<String>,

    pub tags: Vec<String>,

    /// Full source file path
    pub source: PathBuf,
}

impl PostInfo {
    /// Create a post with minimal required fields
    pub fn new(slug: &str, title: &str, published: DateTime<Local>, content: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            published,
            content: content.to_string(),
            authors: Vec::new(),
            description: None,
            tags: Vec::new(),
            source: PathBuf::new(),
        }
    }

    /// Author names joined for display
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Lightweight summary used on the index page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewPost {
    pub slug: String,
    pub title: String,
    pub published: String,
}

impl From<&PostInfo> for ListViewPost {
    fn from(post: &PostInfo) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            published: post.published.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Index listing, newest first
pub type ListViewPosts = Vec<ListViewPost>;

/// Build the index listing from loaded posts
pub fn list_view(posts: &[PostInfo]) -> ListViewPosts {
    let mut sorted: Vec<&PostInfo> = posts.iter().collect();
    sorted.sort_by(|a, b| b.published.cmp(&a.published));
    sorted.into_iter().map(ListViewPost::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, day: u32) -> PostInfo {
        let date = Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        PostInfo::new(slug, &slug.to_uppercase(), date, "")
    }

    #[test]
    fn test_list_view_sorted_newest_first() {
        let posts = vec![post("old", 1), post("new", 20), post("mid", 10)];
        let list = list_view(&posts);
        let slugs: Vec<_> = list.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
        assert_eq!(list[0].published, "2024-01-20");
        assert_eq!(list[0].title, "NEW");
    }

    #[test]
    fn test_author_names() {
        let mut p = post("a", 1);
        p.authors = vec![
            Author {
                id: "crutchcorn".to_string(),
                name: "Corbin".to_string(),
                profile_img: PathBuf::from("c.png"),
            },
            Author {
                id: "edpratti".to_string(),
                name: "Ed".to_string(),
                profile_img: PathBuf::from("e.png"),
            },
        ];
        assert_eq!(p.author_names(), "Corbin, Ed");
    }
}
