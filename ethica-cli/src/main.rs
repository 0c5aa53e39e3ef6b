//! Ethica CLI: AI ethics compliance checks from the terminal.

mod commands;

use clap::Parser;
use ethica_core::ReportFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Ethica: framework-agnostic AI ethics compliance checking
#[derive(Parser, Debug)]
#[command(name = "ethica", version, about, long_about = None)]
struct Cli {
    /// Project directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Framework catalog directory (holds registry.yaml)
    #[arg(long)]
    frameworks_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Initialize ethics compliance in your project
    Init {
        /// Framework to initialize with
        #[arg(short, long)]
        framework: Option<String>,
        /// Compliance level (basic, standard, verified)
        #[arg(short, long)]
        level: Option<String>,
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Run ethics compliance checks on your project
    Check {
        /// Override framework from config
        #[arg(short, long)]
        framework: Option<String>,
        /// Override compliance level from config
        #[arg(short, long)]
        level: Option<String>,
        /// Output format (text, json, markdown)
        #[arg(short, long)]
        output: Option<ReportFormat>,
        /// Show passed and skipped checks too
        #[arg(short, long)]
        verbose: bool,
        /// Also write the report to the configured output directory
        #[arg(long)]
        save: bool,
    },
    /// Manage ethics frameworks
    Frameworks {
        #[command(subcommand)]
        action: FrameworksAction,
    },
    /// Show version information
    Version,
}

#[derive(clap::Subcommand, Debug)]
enum FrameworksAction {
    /// List all available frameworks
    List,
    /// Show detailed information about a framework
    Info {
        /// Framework id (e.g., unesco-2021)
        id: String,
    },
    /// Validate a framework specification file
    Validate {
        /// Path to a framework.yaml document
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr, RUST_LOG wins over -v
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)));

    // JSON file layer for structured logging
    let log_dir = ethica_core::settings::project_dirs()
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "ethica.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = commands::resolve_workspace(&cli.workspace)?;

    let overrides = ethica_core::SettingsOverrides {
        frameworks_dir: cli.frameworks_dir,
        color: cli.no_color.then_some(false),
    };
    let settings = ethica_core::load_settings(Some(&workspace), Some(&overrides))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let ctx = commands::Context::new(workspace, settings);
    commands::handle_command(cli.command, &ctx)
}
