//! `markdown-file-inventory` command line entry point

use anyhow::Result;
use clap::Parser;
use mdinventory::{run_all, ChangeWatcher, Config};
use mdinventory_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "markdown-file-inventory",
    about = "Generate markdown index files from tagged notes",
    after_help = "Example: markdown-file-inventory ./project"
)]
struct Cli {
    /// Enable watch mode to automatically re-run tasks on file changes
    #[arg(long)]
    watch: bool,

    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Folder containing .markdown-file-inventory.yaml
    root_folder: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = init_logging(LogConfig {
        app_name: "markdown-file-inventory",
        verbose: cli.verbose,
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from_root(&cli.root_folder)?;

    run_all(&cli.root_folder, &config);

    if cli.watch {
        let watcher = ChangeWatcher::new(&cli.root_folder, &config)?;
        watcher.run(|| {
            run_all(&cli.root_folder, &config);
        });
    }

    Ok(())
}
