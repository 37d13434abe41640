//! Gateway configuration management
//!
//! This crate provides configuration loading and parsing for the gateway:
//! - TOML configuration file parsing with unknown-field rejection
//! - Immutable, shareable gateway configuration structures

pub mod gateway_config;
pub mod toml_config;

pub use gateway_config::*;
pub use toml_config::*;
