//! Online media metadata: resolving, fetching, normalizing and syncing.
//!
//! # Module layout
//!
//! - [`resolver`] -- Video id extraction from Twitch URLs.
//! - [`provider`] -- The [`OEmbedProvider`] trait and raw provider records.
//! - [`providers`] -- Concrete providers (Twitch Helix).
//! - [`normalizer`] -- Provider records to stored metadata.
//! - [`store`] -- Storage seams and their SQLite implementation.
//! - [`sync`] -- Batch and single-file metadata sync.
//! - [`import`] -- Creating online media files from URLs.

pub mod import;
pub mod normalizer;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod store;
pub mod sync;

pub use import::MediaImporter;
pub use normalizer::{CanonicalMetadata, MetadataNormalizer};
pub use provider::{OEmbedProvider, ProviderRecord};
pub use resolver::{public_url, resolve_video_id, VideoReference};
pub use store::{DbStore, DerivedFileStore, FileIndex, MetadataStore};
pub use sync::{MetadataSyncJob, SyncResult, SyncStatus};
