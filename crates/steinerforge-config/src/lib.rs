//! Configuration system for SteinerForge.
//!
//! Load local-search configuration from TOML or YAML to control the restart
//! cap, the enabled move families and the prize-collecting greedy extension
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use steinerforge_config::LocalSearchConfig;
//!
//! let config = LocalSearchConfig::from_toml_str(r#"
//!     max_restarts = 4
//!
//!     [moves]
//!     key_path_exchange = false
//! "#).unwrap();
//!
//! assert_eq!(config.max_restarts, 4);
//! assert!(config.moves.vertex_insertion);
//! assert!(!config.moves.key_path_exchange);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use steinerforge_config::LocalSearchConfig;
//!
//! let config = LocalSearchConfig::load("local_search.toml").unwrap_or_default();
//! assert_eq!(config.max_restarts, 6);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default cap on key-vertex passes.
pub const DEFAULT_MAX_RESTARTS: usize = 6;

/// Main local-search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Maximum number of key-vertex passes.
    pub max_restarts: usize,

    /// Enabled move families.
    pub moves: MoveConfig,

    /// Greedy extension for prize-collecting and maximum-weight instances.
    pub greedy_extension: GreedyExtensionConfig,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_restarts: DEFAULT_MAX_RESTARTS,
            moves: MoveConfig::default(),
            greedy_extension: GreedyExtensionConfig::default(),
        }
    }
}

impl LocalSearchConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the cap on key-vertex passes.
    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Replaces the enabled move families.
    pub fn with_moves(mut self, moves: MoveConfig) -> Self {
        self.moves = moves;
        self
    }

    /// Replaces the greedy extension settings.
    pub fn with_greedy_extension(mut self, greedy_extension: GreedyExtensionConfig) -> Self {
        self.greedy_extension = greedy_extension;
        self
    }

    /// Checks the settings for values the local search cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = &self.greedy_extension;
        if extension.enabled && (extension.extensions == 0 || extension.extensions_mw == 0) {
            return Err(ConfigError::Invalid(
                "greedy extension needs at least one candidate per round".to_string(),
            ));
        }
        Ok(())
    }
}

/// Move families run by the local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MoveConfig {
    /// Insert non-tree vertices and drop the costliest cycle edges.
    pub vertex_insertion: bool,

    /// Remove a non-terminal key vertex with its key paths.
    pub key_vertex_elimination: bool,

    /// Replace a key path by a cheaper boundary path.
    pub key_path_exchange: bool,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            vertex_insertion: true,
            key_vertex_elimination: true,
            key_path_exchange: true,
        }
    }
}

impl MoveConfig {
    /// Returns `true` if a key-vertex pass has anything to do.
    pub fn any_key_vertex_move(&self) -> bool {
        self.key_vertex_elimination || self.key_path_exchange
    }
}

/// Greedy extension towards unspanned prized nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GreedyExtensionConfig {
    pub enabled: bool,

    /// Number of extension rounds.
    pub max_restarts: usize,

    /// Candidates tried per round on prize-collecting instances.
    pub extensions: usize,

    /// Candidates tried per round on maximum-weight instances.
    pub extensions_mw: usize,
}

impl Default for GreedyExtensionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_restarts: 3,
            extensions: 5,
            extensions_mw: 6,
        }
    }
}
