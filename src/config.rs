use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tree: TreeConfig,
    pub lists: ListsConfig,
    pub whitespace: WhitespaceConfig,
}

/// Where the editor's document tree rides along inside the HTML payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub marker: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            marker: "TREE_JSON".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListsConfig {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl ListsConfig {
    /// Indentation prefix for a list at `depth`.
    pub fn prefix(&self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WhitespaceConfig {
    pub nbsp: String,
    pub tab_width: usize,
    pub break_tag: String,
}

impl Default for WhitespaceConfig {
    fn default() -> Self {
        Self {
            nbsp: "&nbsp;".to_string(),
            tab_width: 4,
            break_tag: "<br>".to_string(),
        }
    }
}

impl WhitespaceConfig {
    /// Replacement text for a single tab.
    pub fn tab(&self) -> String {
        self.nbsp.repeat(self.tab_width)
    }
}

impl Config {
    /// The settings shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(Error::Io { .. }) => Self::compiled_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable config");
                Self::compiled_default()
            }
        }
    }

    /// Load config from a TOML file, failing on a missing file or bad syntax.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
