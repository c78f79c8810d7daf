//! Concrete online media provider implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`OEmbedProvider`](super::OEmbedProvider) trait.

pub mod twitch;

pub use twitch::TwitchProvider;
