use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use termlinks::commands::{self, OutputFormat};
use termlinks::{Config, Error, diagnostics, watch};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "termlinks", about = "Find file paths, commits, and issue references in terminal output")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Read settings from this file instead of ./.termlinks.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a path against the working directory
    Resolve {
        /// The path as it appears in terminal output
        path: String,
        /// Working directory (overrides working_dir)
        #[arg(long)]
        cwd: Option<String>,
    },
    /// Print every link in a transcript (stdin if no file)
    Scan {
        /// Captured terminal output
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Working directory (overrides working_dir)
        #[arg(long)]
        cwd: Option<String>,
        /// Repository remote (overrides remote_url)
        #[arg(long)]
        remote: Option<String>,
    },
    /// Print the URL for a commit hash, #issue, or org/repo#issue
    Url {
        /// The reference, e.g. abc1234, '#42', org/repo#42
        reference: String,
        /// Repository remote (overrides remote_url)
        #[arg(long)]
        remote: Option<String>,
    },
    /// Follow a transcript and print links in appended rows
    Watch {
        /// Captured terminal output
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Working directory (overrides working_dir)
        #[arg(long)]
        cwd: Option<String>,
        /// Repository remote (overrides remote_url)
        #[arg(long)]
        remote: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        return match cli.command {
            Commands::Resolve { path, cwd } => commands::resolve(&config.with_overrides(cwd, None), &path),
            Commands::Scan { file, format, cwd, remote } => {
                commands::scan(&config.with_overrides(cwd, remote), file.as_deref(), format)
            },
            Commands::Url { reference, remote } => commands::url(&config.with_overrides(None, remote), &reference),
            Commands::Watch { file, format, cwd, remote } => {
                watch::run(&config.with_overrides(cwd, remote), &file, format)
            },
        };
    });

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| return tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config from `--config`, or `.termlinks.toml` in the current directory.
///
/// # Errors
///
/// Returns errors from reading or parsing the config file.
fn load_config(explicit: Option<&Path>) -> Result<Config, Error> {
    return match explicit {
        Some(path) => Config::load_file(path),
        None => Config::load(Path::new(".")),
    };
}
