//! Application configuration module.
//!
//! Manages the TOML config file holding API credentials, with environment
//! variable overrides.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TMDB_API_KEY_ENV, YOUTUBE_API_KEY_ENV};
pub use paths::resolve_config_path;
