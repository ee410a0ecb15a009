//! Runs every configured task in order

use crate::config::Config;
use crate::runner::run_task;
use std::path::Path;
use tracing::error;

/// Per-run task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Run all tasks sequentially. A failing task is reported and the batch continues.
pub fn run_all(root: &Path, config: &Config) -> RunSummary {
    let mut summary = RunSummary::default();

    for (index, task) in config.tasks.iter().enumerate() {
        let task_num = index + 1;
        println!(
            "Processing task {}: {}{}",
            task_num,
            task.output_file,
            task.describe_tags()
        );

        match run_task(task, root) {
            Ok(report) => {
                let template_msg = report
                    .template
                    .as_deref()
                    .map(|t| format!(" (using template: {})", t))
                    .unwrap_or_default();
                println!(
                    "  Created {} with {} files{}",
                    report.output_file, report.files_written, template_msg
                );
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(
                    "Error processing task {} ({}): {}",
                    task_num, task.output_file, e
                );
                summary.failed += 1;
            }
        }
    }

    if summary.failed == 0 {
        println!("All tasks completed successfully!");
    } else {
        println!(
            "All tasks completed ({} succeeded, {} failed)",
            summary.succeeded, summary.failed
        );
    }
    summary
}
