//! Presentational card components

use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::content::PostInfo;
use crate::error::PreviewError;

const CARD_TEMPLATE: &str = "twitter-large-card.html";

/// Author as shown on a card
#[derive(Debug, Clone, Serialize)]
pub struct CardAuthor {
    pub name: String,
    /// `data:` URI of the profile image
    pub image: String,
}

/// Post fields exposed to card templates
#[derive(Debug, Clone, Serialize)]
pub struct CardPost {
    pub slug: String,
    pub title: String,
    pub published: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub authors: Vec<CardAuthor>,
}

/// Everything a card needs to render
#[derive(Debug, Clone, Serialize)]
pub struct CardProps<'a> {
    pub post: CardPost,
    pub post_html: &'a str,
    pub width: u32,
    pub height: u32,
    pub logo: String,
}

impl<'a> CardProps<'a> {
    /// Pair each author with its embedded image, in order
    pub fn new(
        post: &PostInfo,
        post_html: &'a str,
        (width, height): (u32, u32),
        author_images: Vec<String>,
        logo: String,
    ) -> Self {
        let authors = post
            .authors
            .iter()
            .zip(author_images)
            .map(|(author, image)| CardAuthor {
                name: author.name.clone(),
                image,
            })
            .collect();

        Self {
            post: CardPost {
                slug: post.slug.clone(),
                title: post.title.clone(),
                published: post.published.format("%B %-d, %Y").to_string(),
                description: post.description.clone(),
                tags: post.tags.clone(),
                authors,
            },
            post_html,
            width,
            height,
            logo,
        }
    }
}

/// A component that renders card props to an HTML fragment
pub trait PreviewCard: Send + Sync {
    fn render(&self, props: &CardProps<'_>) -> Result<String, PreviewError>;
}

/// 2:1 card used for `twitter:card = summary_large_image`
pub struct TwitterLargeCard {
    tera: Tera,
}

impl TwitterLargeCard {
    /// Card using the built-in template
    pub fn new() -> Result<Self, PreviewError> {
        Self::from_template(include_str!("templates/twitter-large-card.html"))
    }

    /// Card using a Tera template source
    pub fn from_template(source: &str) -> Result<Self, PreviewError> {
        let mut tera = Tera::default();
        tera.add_raw_template(CARD_TEMPLATE, source)
            .map_err(|e| PreviewError::ModuleLoad(format!("invalid card template: {}", e)))?;
        Ok(Self { tera })
    }

    /// Card using a template file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreviewError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| PreviewError::ModuleLoad(format!("cannot load {:?}: {}", path, e)))?;
        tracing::debug!("Loaded card template from {:?}", path);
        Self::from_template(&source)
    }
}

impl PreviewCard for TwitterLargeCard {
    fn render(&self, props: &CardProps<'_>) -> Result<String, PreviewError> {
        let context = Context::from_serialize(props)
            .map_err(|e| PreviewError::ModuleLoad(e.to_string()))?;
        self.tera
            .render(CARD_TEMPLATE, &context)
            .map_err(|e| PreviewError::ModuleLoad(format!("card render failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Author;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    fn post() -> PostInfo {
        let date = Local.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let mut post = PostInfo::new("hello-world", "Hello <World>", date, "");
        post.authors = vec![Author {
            id: "a".to_string(),
            name: "A".to_string(),
            profile_img: PathBuf::from("a.png"),
        }];
        post
    }

    #[test]
    fn test_props_pair_authors_with_images() {
        let p = post();
        let props = CardProps::new(&p, "<pre></pre>", (1280, 640), vec!["data:x".to_string()], String::new());
        assert_eq!(props.post.authors.len(), 1);
        assert_eq!(props.post.authors[0].image, "data:x");
        assert_eq!(props.post.published, "March 5, 2024");
    }

    #[test]
    fn test_builtin_card_renders() {
        let card = TwitterLargeCard::new().unwrap();
        let p = post();
        let props = CardProps::new(
            &p,
            "<pre class=\"highlight\"></pre>",
            (1280, 640),
            vec!["data:image/png;base64,AAAA".to_string()],
            "data:image/png;base64,BBBB".to_string(),
        );
        let html = card.render(&props).unwrap();
        assert!(html.contains("width: 1280px; height: 640px;"));
        assert!(html.contains("<pre class=\"highlight\"></pre>"));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
        assert!(html.contains("src=\"data:image/png;base64,BBBB\""));
    }

    #[test]
    fn test_broken_template_is_module_load_error() {
        let err = TwitterLargeCard::from_template("{% if %}").err().unwrap();
        assert!(matches!(err, PreviewError::ModuleLoad(_)));
        let err = TwitterLargeCard::from_file("/definitely/not/here.html").err().unwrap();
        assert!(matches!(err, PreviewError::ModuleLoad(_)));
    }
}
