//! Social preview documents
//!
//! A preview is a self-contained HTML document (inlined stylesheets,
//! base64 images) sized for a Twitter large card, ready for a rasterizer.

mod assets;
mod card;
mod rasterize;
mod renderer;

pub use assets::{data_uri, detect_image_mime, AssetStore, FsAssetStore};
pub use card::{CardAuthor, CardPost, CardProps, PreviewCard, TwitterLargeCard};
pub use rasterize::{CommandRasterizer, Rasterizer};
pub use renderer::{render_source, PreviewRenderer};
