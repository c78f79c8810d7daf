//! Twitchmedia-DB: file index, metadata, and processed-file storage
//!
//! This crate stands in for the host CMS storage layer using SQLite with
//! rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use twitchmedia_db::pool::{init_pool, get_conn};
//! use twitchmedia_db::queries::files;
//!
//! let pool = init_pool("/var/lib/twitchmedia/db.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let videos = files::get_videos_by_file_extension(&conn, "twitch", 10).unwrap();
//! println!("{} candidate videos", videos.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
