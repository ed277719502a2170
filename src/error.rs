//! Error types for the transform chain, preview rendering and site builds

use std::path::PathBuf;

/// Markdown transform chain error
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The markdown is structurally invalid (unbalanced code fence)
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The highlighter has no grammar for the language tag
    #[error("cannot highlight language `{lang}`")]
    Highlight { lang: String },

    /// The highlighter failed while tokenizing
    #[error("highlighter failed: {0}")]
    Render(String),
}

/// Preview document rendering error
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// A stylesheet or image could not be read
    #[error("failed to read asset {path:?}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The presentational card could not be loaded or rendered
    #[error("card component failed: {0}")]
    ModuleLoad(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The external rasterizer failed
    #[error("rasterizer failed: {0}")]
    Rasterize(String),
}

/// A failure while building a single post, tagged with its slug
#[derive(Debug, thiserror::Error)]
#[error("post `{slug}`: {error:#}")]
pub struct BuildError {
    pub slug: String,
    pub error: anyhow::Error,
}

impl BuildError {
    pub fn new(slug: &str, error: impl Into<anyhow::Error>) -> Self {
        Self {
            slug: slug.to_string(),
            error: error.into(),
        }
    }
}
