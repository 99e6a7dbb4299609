//! Site tooling: an SVG sprite sheet builder and a Markdown article exporter.
//!
//! - [`sprite`]: merge a directory of icons into one hidden inline `<svg>`
//! - [`export`]: write a plain Markdown copy of every article

pub mod cli;
pub mod config;
pub mod export;
pub mod logger;
pub mod sprite;
pub mod utils;
