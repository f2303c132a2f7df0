//! Console configuration via `canopy.toml`
//!
//! Optional file with three sections: the store to connect to, the plan
//! generator endpoint, and tree view defaults. `canopy init` writes the
//! commented default; the console never rewrites it on its own.

use std::path::Path;

use serde::{Deserialize, Serialize};

use canopy_core::{TreeView, DEFAULT_EXPAND_DEPTH, MAX_NESTING_DEPTH};
use canopy_intelligence::ApiPlanner;

use crate::{Error, Result};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "canopy.toml";

/// Store to connect to at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Database URL or bare project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Access token sent as the `auth` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

/// Configuration for the plan generator endpoint.
///
/// Persisted in `canopy.toml` under the `[model]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// OpenAI-compatible API endpoint (e.g. "http://localhost:11434/v1")
    pub endpoint: String,
    /// Model name (e.g. "qwen3:1.7b")
    pub model: String,
    /// Optional API key for authenticated endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl ModelConfig {
    /// Build the plan generator this section describes
    pub fn planner(&self) -> ApiPlanner {
        ApiPlanner::new(
            &self.endpoint,
            &self.model,
            self.api_key.as_deref(),
            self.timeout_ms,
        )
    }
}

/// Tree view defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewConfig {
    /// Levels expanded by default
    #[serde(default = "default_expand_depth")]
    pub expand_depth: usize,
    /// Rendering stops descending at this depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_expand_depth() -> usize {
    DEFAULT_EXPAND_DEPTH
}

fn default_max_depth() -> usize {
    MAX_NESTING_DEPTH
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            expand_depth: default_expand_depth(),
            max_depth: default_max_depth(),
        }
    }
}

impl ViewConfig {
    /// A fresh view with these settings
    pub fn tree_view(&self) -> TreeView {
        TreeView::new(self.expand_depth, self.max_depth)
    }
}

/// Console configuration loaded from `canopy.toml`.
///
/// # Example
///
/// ```toml
/// [store]
/// url = "my-project"
///
/// [model]
/// endpoint = "http://localhost:11434/v1"
/// model = "qwen3:1.7b"
///
/// [view]
/// expand_depth = 2
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// Store connection settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Optional plan generator endpoint. Plans are unavailable without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfig>,
    /// Tree view defaults.
    #[serde(default)]
    pub view: ViewConfig,
}

impl ConsoleConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Canopy console configuration
#
# Store to connect to at startup. Accepts a full URL
# ("https://my-project-default-rtdb.firebaseio.com") or a bare project id.
[store]
# url = "my-project"
# auth = "your-access-token"    # optional, sent as ?auth=

# Plan generator for the `plan` command.
# Uncomment and configure to turn instructions into action plans.
# [model]
# endpoint = "http://localhost:11434/v1"
# model = "qwen3:1.7b"
# api_key = "your-api-key"      # optional
# timeout_ms = 30000             # optional, default 30000

# Tree view defaults.
[view]
expand_depth = 2
max_depth = 100
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ConsoleConfig = toml::from_str(content).map_err(|e| Error::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config { reason } => Error::Config {
                reason: format!("failed to parse config file '{}': {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` when the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| Error::Config {
            reason: format!(
                "failed to write default config file '{}': {}",
                path.display(),
                e
            ),
        })?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("failed to write config file '{}': {}", path.display(), e),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.view.max_depth == 0 {
            return Err(Error::Config {
                reason: "view.max_depth must be at least 1".into(),
            });
        }
        if let Some(model) = &self.model {
            if model.endpoint.trim().is_empty() || model.model.trim().is_empty() {
                return Err(Error::Config {
                    reason: "model.endpoint and model.model must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}
