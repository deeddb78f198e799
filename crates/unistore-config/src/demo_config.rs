//! Demo application configuration
//!
//! Configuration loaded from `.unistore-demo.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config_file::{load_config_file, read_config_file};
use crate::error::ConfigError;

/// Demo configuration loaded from .unistore-demo.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DemoConfig {
    /// Log level used when `RUST_LOG` is not set ("error" .. "trace")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Install the logging middleware
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,

    /// Value of the counter slice before the first action
    #[serde(default)]
    pub initial_counter: i64,

    /// Maximum number of todos; further `todo/add` actions are rejected
    #[serde(default = "default_max_todos")]
    pub max_todos: usize,

    /// Actions to dispatch, one per line: `type` or `type:payload`
    #[serde(default = "default_script")]
    pub script: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_actions() -> bool {
    true
}

fn default_max_todos() -> usize {
    3
}

fn default_script() -> Vec<String> {
    [
        "counter/inc",
        "counter/inc",
        "todo/add:write the reducer",
        "todo/add:wire the middleware",
        "counter/dec",
        "todo/toggle:0",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_actions: default_log_actions(),
            initial_counter: 0,
            max_todos: default_max_todos(),
            script: default_script(),
        }
    }
}

/// A config together with the file it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: DemoConfig,

    /// `None` when no config file was found and defaults are used
    pub source: Option<PathBuf>,
}

impl DemoConfig {
    /// Load config from the first config file found, or use defaults
    ///
    /// Defaults are only used when no config file exists; a file that can't
    /// be read or parsed is reported as an error.
    pub fn load() -> Result<LoadedConfig, ConfigError> {
        match load_config_file()? {
            Some((path, content)) => {
                let config = Self::from_toml_str(&content).map_err(|e| e.in_file(&path))?;
                Ok(LoadedConfig {
                    config,
                    source: Some(path),
                })
            }
            None => Ok(LoadedConfig {
                config: Self::default(),
                source: None,
            }),
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config_file(path)?;
        Self::from_toml_str(&content).map_err(|e| e.in_file(path))
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.level_filter()?;
        config.scripted_actions()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// The script, parsed
    pub fn scripted_actions(&self) -> Result<Vec<ScriptedAction>, ConfigError> {
        self.script.iter().map(|line| line.parse()).collect()
    }
}

/// One line of the action script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedAction {
    pub kind: String,
    pub payload: Option<String>,
}

impl FromStr for ScriptedAction {
    type Err = ConfigError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, payload) = match line.split_once(':') {
            Some((kind, payload)) => (kind.trim(), Some(payload.trim().to_string())),
            None => (line.trim(), None),
        };
        if kind.is_empty() {
            return Err(ConfigError::EmptyActionType(line.to_string()));
        }
        Ok(Self {
            kind: kind.to_string(),
            payload,
        })
    }
}
