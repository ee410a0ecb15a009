//! Markdown File Inventory - index generation for folders of notes
//!
//! Walks configured folders, keeps files whose extension and tags match a
//! task, and writes one index file per task listing them as links with
//! their modification dates.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐     ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Config  │────▶│  Task walk   │────▶│ Tag filter  │────▶│ Sorted index │
//! │  (YAML)  │     │ (folder×ext) │     │ (meta/#tag) │     │    output    │
//! └──────────┘     └──────────────┘     └─────────────┘     └──────────────┘
//!                         ▲
//!                         │ rerun per event
//!                  ┌──────────────┐
//!                  │ChangeWatcher │
//!                  └──────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Task**: one output file built from folders, extensions and optional tags
//! - **Metadata block**: a leading `---` (YAML) or `+++` (TOML) block declaring `tags`
//! - **Inline marker**: a literal `#tag` anywhere in a file's text

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod orchestrator;
pub mod render;
pub mod runner;
pub mod tagger;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, Task, CONFIG_FILE_NAME};
pub use error::{InventoryError, Result};
pub use frontmatter::{extract_tags, FrontMatterStyle};
pub use orchestrator::{run_all, RunSummary};
pub use runner::{discover, run_task, DiscoveredFile, TaskReport};
pub use tagger::{file_contains_tags, TagFilter};
pub use watcher::ChangeWatcher;
