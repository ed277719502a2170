//! Preview document renderer

use lazy_static::lazy_static;
use std::path::Path;

use super::assets::{data_uri, AssetStore, FsAssetStore};
use super::card::{CardProps, PreviewCard, TwitterLargeCard};
use crate::config::{ColorTheme, PreviewConfig};
use crate::content::PostInfo;
use crate::error::PreviewError;
use crate::transform::TransformChain;
use crate::Site;

/// Builds self-contained card documents for posts
pub struct PreviewRenderer {
    config: PreviewConfig,
    colors: ColorTheme,
    assets: Box<dyn AssetStore>,
    card: Box<dyn PreviewCard>,
    chain: TransformChain,
}

impl PreviewRenderer {
    pub fn new(
        config: PreviewConfig,
        highlight_theme: &str,
        colors: ColorTheme,
        assets: Box<dyn AssetStore>,
        card: Box<dyn PreviewCard>,
    ) -> Self {
        Self {
            config,
            colors,
            assets,
            card,
            chain: TransformChain::new(highlight_theme, render_source()),
        }
    }

    /// Renderer wired to a site's asset directory and card template
    pub fn for_site(site: &Site) -> Result<Self, PreviewError> {
        let card = match &site.config.preview.card_template {
            Some(path) => TwitterLargeCard::from_file(site.asset_dir.join(path))?,
            None => TwitterLargeCard::new()?,
        };

        Ok(Self::new(
            site.config.preview.clone(),
            &site.config.highlight.theme,
            site.config.colors.clone(),
            Box::new(FsAssetStore::new(&site.asset_dir)),
            Box::new(card),
        ))
    }

    /// Output image size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Render the full preview document for a post
    pub fn render(&self, post: &PostInfo) -> Result<String, PreviewError> {
        let code_css = self.assets.read_to_string(Path::new(&self.config.code_stylesheet))?;
        let colors_css = self.colors.to_css_variables();
        let card_css = self.assets.read_to_string(Path::new(&self.config.card_stylesheet))?;

        let author_images = post
            .authors
            .iter()
            .map(|author| self.assets.read_bytes(&author.profile_img).map(|b| data_uri(&b)))
            .collect::<Result<Vec<_>, _>>()?;
        let logo = data_uri(&self.assets.read_bytes(Path::new(&self.config.logo))?);

        let post_html = self.chain.transform(&post.content)?;

        let props = CardProps::new(post, &post_html, self.dimensions(), author_images, logo);
        let body = self.card.render(&props)?;

        Ok(document_shell(&[&code_css, &colors_css, &card_css], &body))
    }
}

/// Wrap a card in a document with the stylesheets inlined in order
fn document_shell(stylesheets: &[&str], body: &str) -> String {
    let mut doc = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    for css in stylesheets {
        doc.push_str("<style>\n");
        doc.push_str(css);
        doc.push_str("\n</style>\n");
    }
    doc.push_str("</head>\n<body>\n");
    doc.push_str(body);
    doc.push_str("\n</body>\n</html>\n");
    doc
}

lazy_static! {
    static ref RENDER_SOURCE: String = {
        let file = include_str!("renderer.rs");
        item_source(file, concat!("pub fn ", "render(&self")).unwrap_or(file).to_string()
    };
}

/// Source text of [`PreviewRenderer::render`], appended to every card's code
pub fn render_source() -> &'static str {
    &RENDER_SOURCE
}

/// Slice out the item starting at `signature`, through its closing brace
fn item_source<'a>(source: &'a str, signature: &str) -> Option<&'a str> {
    let found = source.find(signature)?;
    let start = source[..found].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let open = found + source[found..].find('{')?;

    let mut depth = 0usize;
    for (offset, c) in source[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[start..=open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
