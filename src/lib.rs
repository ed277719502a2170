//! utterances-rs: a blog generator with social preview cards
//!
//! Posts are loaded from markdown, rendered to static pages with Tera
//! templates, and turned into self-contained HTML documents that an
//! external rasterizer converts into Open Graph / Twitter card images.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod pages;
pub mod preview;
pub mod templates;
pub mod transform;

use anyhow::Result;
use std::path::Path;

/// A blog site rooted at a directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Markdown content directory
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Stylesheets, images and card templates
    pub asset_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Site from an already-loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let asset_dir = base_dir.join(&config.asset_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            asset_dir,
        }
    }

    /// Generate the static site and preview documents
    pub fn generate(&self, rasterize: bool) -> Result<generator::BuildReport> {
        commands::generate::run(self, rasterize)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title)
    }
}
