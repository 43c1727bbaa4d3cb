//! `labelpool` command line entry point.
//!
//! Without a subcommand the interactive TUI is launched.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use lp_core::config::loader::load_config;
use lp_core::config::CONFIG_DIR;
use lp_core::init::{generate_labelpool_structure, InitOptions};
use lp_protocol::task_models::{TaskDefinition, TaskKind};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "labelpool.log";

#[derive(Parser, Debug)]
#[command(name = "labelpool", version, about = "Complete labeling tasks from the terminal")]
struct Cli {
    /// Directory containing `.labelpool/`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse and complete tasks (default)
    Tui,

    /// Create `.labelpool/` with a config and sample tasks
    Init {
        /// Overwrite an existing `.labelpool/`
        #[arg(long)]
        force: bool,

        /// Only write the config and one image task
        #[arg(long)]
        minimal: bool,
    },

    /// List the task catalog
    Tasks {
        /// Print the task definitions as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let _guard = init_file_logging(&cli.root);
            let config = load_config(&cli.root)
                .await
                .wrap_err("Failed to load .labelpool configuration")?;
            lp_tui::run_app(config)
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e))
        }
        Command::Init { force, minimal } => {
            init_stderr_logging();
            init(&cli.root, force, minimal).await
        }
        Command::Tasks { json } => {
            init_stderr_logging();
            let config = load_config(&cli.root)
                .await
                .wrap_err("Failed to load .labelpool configuration")?;
            print_tasks(&config.tasks, json)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so logs go to `.labelpool/labelpool.log`.
///
/// Nothing is logged when the project has not been initialized.
fn init_file_logging(root: &Path) -> Option<WorkerGuard> {
    let dir = root.join(CONFIG_DIR);
    if !dir.is_dir() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

async fn init(root: &Path, force: bool, minimal: bool) -> Result<()> {
    let written = generate_labelpool_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    })
    .await?;

    println!(
        "{} {}",
        "Initialized".green().bold(),
        root.join(CONFIG_DIR).display()
    );
    for path in written {
        let shown = path.strip_prefix(root).unwrap_or(&path);
        println!("  {} {}", "+".green(), shown.display());
    }
    println!("Run {} to start labeling.", "labelpool".cyan());
    Ok(())
}

fn print_tasks(tasks: &[TaskDefinition], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!(
            "No tasks found. Run {} to create sample tasks.",
            "labelpool init".cyan()
        );
        return Ok(());
    }

    for task in tasks {
        // Pad before coloring; escape codes would count towards the width.
        let kind = match task.kind() {
            TaskKind::Image => "image ".magenta(),
            TaskKind::Audio => "audio ".bright_cyan(),
            TaskKind::Text => "text  ".yellow(),
        };
        println!(
            "{} {} {}  {} {}",
            kind,
            format!("{:<20}", task.id).bold(),
            task.title,
            format!("{:.2} POOL", task.reward).green(),
            format!("{} XP", task.xp).cyan(),
        );
    }
    Ok(())
}
