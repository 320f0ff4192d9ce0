//! Domain logic for the lyricsync subtitle burn pipeline.
//!
//! This crate has no internal dependencies so it can be used by the API
//! layer, the repository layer, and any future worker or CLI tooling.

pub mod ass;
pub mod burn;
pub mod environment;
pub mod error;
pub mod ffmpeg;
pub mod owner_key;
pub mod segments;
pub mod style;
pub mod subtitle;
pub mod transcript;
