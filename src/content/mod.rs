//! Content module - handles posts, authors, and markdown processing

mod frontmatter;
pub mod iframe;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use iframe::IframePlaceholder;
pub use markdown::MarkdownRenderer;
pub use post::{list_view, Author, ListViewPost, ListViewPosts, PostInfo};
