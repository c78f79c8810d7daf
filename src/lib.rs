//! Twitch online media - metadata sync and embed rendering.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod app;
pub mod config;
pub mod images;
pub mod metadata;
pub mod rendering;
pub mod server;
