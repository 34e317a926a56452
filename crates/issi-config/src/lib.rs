//! Gateway configuration management
//!
//! This crate provides configuration loading and parsing for the ISSI gateway:
//! - TOML configuration file parsing
//! - Gateway configuration structures and shared runtime state
//! - ISSI RTP-side settings

pub mod gateway_config;
pub mod gateway_config_issi;
pub mod toml_config;

pub use gateway_config::*;
pub use gateway_config_issi::CfgIssi;
pub use toml_config::*;
