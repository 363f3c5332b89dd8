//! Configuration utilities

/// TOML configuration (`marketlens.toml`).
pub mod toml_config;
