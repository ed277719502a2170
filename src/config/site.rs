//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ColorTheme;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub asset_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub rasterizer: RasterizerConfig,

    // Theme
    #[serde(default)]
    pub colors: ColorTheme,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Unicorn Utterances".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            url: "http://example.com".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            asset_dir: "assets".to_string(),

            highlight: HighlightConfig::default(),
            preview: PreviewConfig::default(),
            rasterizer: RasterizerConfig::default(),

            colors: ColorTheme::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Theme used by the preview transform chain. `css-variables` emits
    /// class names styled by the code stylesheet.
    pub theme: String,
    /// Theme used when rendering post pages
    pub site_theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "css-variables".to_string(),
            site_theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Social preview card configuration.
///
/// All paths are relative to the asset directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub code_stylesheet: String,
    pub card_stylesheet: String,
    pub logo: String,
    /// Replaces the built-in card template when set
    pub card_template: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 640,
            code_stylesheet: "styles/code.css".to_string(),
            card_stylesheet: "social-previews/twitter-large-card.css".to_string(),
            logo: "unicorn_head_1024.png".to_string(),
            card_template: None,
        }
    }
}

/// External HTML-to-PNG command.
///
/// `{width}` and `{height}` in `args` are substituted before spawning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
}
