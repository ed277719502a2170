//! Page renderer - maps posts to the index and post detail pages

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{ListViewPost, MarkdownRenderer, PostInfo};
use crate::templates::{ConfigData, IndexPostData, PostPageData, TemplateRenderer};

/// Renders site pages from loaded posts
pub struct PageRenderer {
    config: SiteConfig,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_options(
                &config.highlight.site_theme,
                config.highlight.line_number,
            ),
            config: config.clone(),
        })
    }

    /// Render the post listing
    pub fn render_index(&self, posts: &[ListViewPost]) -> Result<String> {
        let posts: Vec<IndexPostData> = posts
            .iter()
            .map(|p| IndexPostData {
                slug: p.slug.clone(),
                title: p.title.clone(),
                published: p.published.clone(),
                path: post_path(&p.slug),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &posts);
        self.templates.render("index.html", &context)
    }

    /// Render a post detail page
    pub fn render_post(&self, post: &PostInfo) -> Result<String> {
        let data = PostPageData {
            slug: post.slug.clone(),
            title: post.title.clone(),
            published: post.published.format("%Y-%m-%d").to_string(),
            authors: post.authors.iter().map(|a| a.name.clone()).collect(),
            tags: post.tags.clone(),
            description: post.description.clone(),
            content: self.markdown.render(&post.content)?,
            social_image: format!(
                "{}/{}",
                self.config.url.trim_end_matches('/'),
                social_image_path(&post.slug)
            ),
        };

        let mut context = self.base_context();
        context.insert("post", &data);
        self.templates.render("post.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                author: self.config.author.clone(),
                url: self.config.url.clone(),
                root: "/".to_string(),
            },
        );
        context.insert("colors_css", &self.config.colors.to_css_variables());
        context
    }
}

/// Site path of a post page
pub fn post_path(slug: &str) -> String {
    format!("/posts/{}/", slug)
}

/// Output path of a post's card image, relative to the public directory
pub fn social_image_path(slug: &str) -> String {
    format!("social-previews/{}.png", slug)
}
