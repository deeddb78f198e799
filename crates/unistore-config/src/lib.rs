//! Configuration for unistore hosts
//!
//! This crate provides:
//! - Config file discovery (CWD first, then the user's config and home directories)
//! - The demo application configuration (`DemoConfig`)
//! - Parsing of scripted action lines (`ScriptedAction`)

pub mod config_file;
pub mod demo_config;
pub mod error;

pub use config_file::{config_file_candidates, load_config_file, CONFIG_FILE};
pub use demo_config::{DemoConfig, LoadedConfig, ScriptedAction};
pub use error::ConfigError;
