//! Twitchmedia-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across twitchmedia:
//!
//! - **Typed IDs**: Type-safe wrappers for file and processed-file uids
//! - **Core Types**: The embed display mode and online media constants
//! - **Path Utilities**: Extension and MIME type detection for online media files
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use twitchmedia_common::{DisplayMode, Error, FileId, Result};
//! use twitchmedia_common::paths::mime_type_for_extension;
//!
//! let file_id = FileId::from(42);
//! assert_eq!(file_id.to_string(), "42");
//!
//! assert_eq!("script".parse::<DisplayMode>().unwrap(), DisplayMode::Script);
//! assert_eq!(mime_type_for_extension("twitch").as_deref(), Some("video/twitch"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("file 42"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
