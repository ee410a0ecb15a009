//! Error types for the inventory generator

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Inventory error type
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Error reading config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing YAML config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Error writing output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, InventoryError>;
