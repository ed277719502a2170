//! Configuration module

mod colors;
mod site;

pub use colors::{ColorTheme, ColorValue};
pub use site::HighlightConfig;
pub use site::PreviewConfig;
pub use site::RasterizerConfig;
pub use site::SiteConfig;
