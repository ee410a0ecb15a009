//! Configuration for the inventory generator
//!
//! Read once from `<root>/.markdown-file-inventory.yaml` at startup.

use crate::error::{InventoryError, Result};
use crate::render::{normalize_extension, DEFAULT_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Name of the config file expected at the root folder.
pub const CONFIG_FILE_NAME: &str = ".markdown-file-inventory.yaml";

/// Join a configured path onto `root`, keeping it under `root`.
///
/// Root and prefix components are dropped, so `/notes` resolves to
/// `<root>/notes` rather than replacing the root.
pub fn resolve_under_root(root: &Path, rel: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            other => path.push(other),
        }
    }
    path
}

/// Ordered list of index-generation tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// One output index file and the criteria selecting its entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Output path, relative to the root folder
    pub output_file: String,

    /// Optional file copied verbatim ahead of the generated lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Folders to walk recursively, relative to the root folder
    pub folders: Vec<String>,

    /// Extensions to match, with or without the leading dot
    pub extensions: Vec<String>,

    /// Required tags; a file needs only one of them. Empty means no filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Line format taking display name, encoded path and date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Path of the config file for a root folder
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            InventoryError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_yaml::from_str(&content).map_err(|source| InventoryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the configuration that lives in `root`
    pub fn load_from_root(root: &Path) -> Result<Self> {
        Self::load(&Self::config_path(root))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Every folder referenced by any task, in first-seen order, without repeats
    pub fn folders(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for folder in self.tasks.iter().flat_map(|t| t.folders.iter()) {
            if !seen.contains(&folder.as_str()) {
                seen.push(folder.as_str());
            }
        }
        seen
    }
}

impl Task {
    /// Extensions with a guaranteed leading `.`
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect()
    }

    /// Format string for rendered lines
    pub fn line_format(&self) -> &str {
        match self.format.as_deref() {
            Some(format) if !format.is_empty() => format,
            _ => DEFAULT_FORMAT,
        }
    }

    /// Template file name, ignoring an empty value
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    /// Human-readable tag filter suffix for progress output
    pub fn describe_tags(&self) -> String {
        if self.tags.is_empty() {
            String::new()
        } else {
            format!(" (filtering by tags: {})", self.tags.join(", "))
        }
    }
}
