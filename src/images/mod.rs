//! Preview image caching and derived renditions.
//!
//! [`PreviewImageCache`] keeps one downloaded thumbnail per video id;
//! [`RenditionService`] produces scaled copies tracked as processed files.

mod preview;
mod rendition;

pub use preview::{md5_hex, PreviewImageCache};
pub use rendition::{RenditionService, PREVIEW_TASK};
