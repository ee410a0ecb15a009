//! Task runner - walk folders, filter by tags, render one index file

use crate::config::{resolve_under_root, Task};
use crate::error::{InventoryError, Result};
use crate::render::{display_name, encode_link_path, format_date, format_line};
use crate::tagger::TagFilter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A matching file found during the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path relative to the root folder, `/`-separated
    pub rel_path: String,
    pub modified: SystemTime,
}

/// Outcome of a completed task
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub output_file: String,
    pub files_written: usize,
    pub template: Option<String>,
    /// Rendered lines in output order, template excluded
    pub lines: Vec<String>,
    /// Paths that could not be accessed during the walk
    pub walk_warnings: usize,
}

/// Result of the discovery phase
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matches sorted by relative path; overlapping folder/extension pairs may repeat a file
    pub files: Vec<DiscoveredFile>,
    pub walk_warnings: usize,
}

/// Join path components with `/` regardless of platform
fn normalize_path_to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk every folder/extension pair of `task` under `root` and collect matches.
pub fn discover(task: &Task, root: &Path) -> Discovery {
    let filter = TagFilter::new(&task.tags);
    let extensions = task.normalized_extensions();
    let mut discovery = Discovery::default();

    for folder in &task.folders {
        let folder_path = resolve_under_root(root, folder);
        for extension in &extensions {
            walk_folder(&folder_path, extension, root, &filter, &mut discovery);
        }
    }

    discovery.files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    discovery
}

fn walk_folder(
    folder_path: &Path,
    extension: &str,
    root: &Path,
    filter: &TagFilter,
    discovery: &mut Discovery,
) {
    for entry in WalkDir::new(folder_path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .unwrap_or(folder_path)
                    .display()
                    .to_string();
                warn!("Cannot access path {}: {}. Skipping.", path, e);
                discovery.walk_warnings += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(extension) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Cannot access path {}: {}. Skipping.", path.display(), e);
                discovery.walk_warnings += 1;
                continue;
            }
        };

        if !filter.matches_file(path) {
            continue;
        }

        let rel_path = path
            .strip_prefix(root)
            .map(normalize_path_to_forward_slashes)
            .unwrap_or_else(|_| normalize_path_to_forward_slashes(path));
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        debug!(path = %rel_path, "Matched file");
        discovery.files.push(DiscoveredFile { rel_path, modified });
    }
}

/// Render the line for one discovered file
pub fn render_file_line(task: &Task, file: &DiscoveredFile) -> String {
    let name = display_name(&file.rel_path, &task.extensions);
    let link = encode_link_path(&file.rel_path);
    let date = format_date(file.modified);
    format_line(task.line_format(), &[name.as_str(), link.as_str(), date.as_str()])
}

/// Run one task against `root`, rewriting its output file.
///
/// Walk and template problems are logged and skipped; only failures to
/// create or write the output file are returned.
pub fn run_task(task: &Task, root: &Path) -> Result<TaskReport> {
    let discovery = discover(task, root);

    let output_path = resolve_under_root(root, &task.output_file);
    let output_err = |source| InventoryError::Output {
        path: output_path.clone(),
        source,
    };

    let file = File::create(&output_path).map_err(output_err)?;
    let mut writer = BufWriter::new(file);

    if let Some(template) = task.template() {
        write_template(&mut writer, &resolve_under_root(root, template)).map_err(output_err)?;
    }

    let mut lines = Vec::with_capacity(discovery.files.len());
    for file in &discovery.files {
        let line = render_file_line(task, file);
        writer.write_all(line.as_bytes()).map_err(output_err)?;
        lines.push(line);
    }
    writer.flush().map_err(output_err)?;

    Ok(TaskReport {
        output_file: task.output_file.clone(),
        files_written: lines.len(),
        template: task.template().map(str::to_string),
        lines,
        walk_warnings: discovery.walk_warnings,
    })
}

/// Copy the template ahead of the generated lines.
///
/// An unreadable template is only a warning; write errors propagate.
fn write_template<W: Write>(writer: &mut W, template_path: &Path) -> std::io::Result<()> {
    let content = match fs::read(template_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                "Error reading template {}: {}",
                template_path.display(),
                e
            );
            return Ok(());
        }
    };

    writer.write_all(&content)?;
    if !content.ends_with(b"\n") {
        writer.write_all(b"\n")?;
    }
    Ok(())
}
