//! sharplint CLI
//!
//! Command-line interface for the sharplint C# style checker

mod commands;
mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::error;

#[derive(Parser)]
#[command(name = "sharplint")]
#[command(about = "sharplint: layout, spacing and precedence checks for C# sources")]
#[command(version = sharplint_core::VERSION)]
#[command(
    long_about = "sharplint checks C# source files for blank-line, bracket-spacing and\n\
operator-precedence style issues and can fix them in place.\n\
\n\
Examples:\n  \
sharplint lint                     # Lint current directory\n  \
sharplint lint --fix src/          # Lint and fix files in src/\n  \
sharplint lint --fix --dry-run .   # Show fixes as a diff\n  \
sharplint rules --detailed         # List all available rules\n  \
sharplint config init              # Initialize configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.sharplintrc.json/.sharplintrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint C# files
    #[command(alias = "check")]
    Lint(LintArgs),

    /// List the built-in rules
    Rules {
        /// Show detailed rule information
        #[arg(long, help = "Show description and documentation link for each rule")]
        detailed: bool,

        /// Filter rules by category
        #[arg(long, help = "Filter rules by category (spacing, layout, maintainability)")]
        category: Option<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct LintArgs {
    /// Files or directories to lint
    #[arg(help = "Files or directories to process (default: current directory)")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(
        short,
        long,
        default_value = "human",
        help = "Output format for diagnostics"
    )]
    pub format: OutputFormat,

    /// Apply fixes and write them to the files
    #[arg(long, help = "Fix what can be fixed and write the files")]
    pub fix: bool,

    /// Show fixes without applying them
    #[arg(
        long,
        requires = "fix",
        help = "Print the fixes as a unified diff instead of writing them"
    )]
    pub dry_run: bool,

    /// Upper bound on fix passes per file
    #[arg(long, help = "Maximum number of fix passes per file")]
    pub max_passes: Option<usize>,

    /// Include patterns (glob syntax)
    #[arg(
        long,
        help = "Include files matching pattern (can be used multiple times)"
    )]
    pub include: Vec<String>,

    /// Exclude patterns (glob syntax)
    #[arg(
        long,
        help = "Exclude files matching pattern (can be used multiple times)"
    )]
    pub exclude: Vec<String>,

    /// Exit with non-zero code on warnings too
    #[arg(long, help = "Exit with non-zero code when warnings are reported")]
    pub error_on_warnings: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Print the JSON schema of the configuration file
    Schema,

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for .sharplintrc)")]
        path: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors and context
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// One line per diagnostic
    Compact,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "sharplint=error", // Only errors by default
        1 => "sharplint=warn",
        2 => "sharplint=info",
        3 => "sharplint=debug",
        _ => "sharplint=trace",
    }
}

fn main() {
    let cli = Cli::parse();

    let use_colors =
        !cli.no_color && std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal();
    colored::control::set_override(use_colors);

    sharplint_core::init_tracing_with_filter(log_filter(cli.verbose));

    match run_command(cli, use_colors) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("sharplint failed: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Run the selected command, returning the process exit code
fn run_command(cli: Cli, use_colors: bool) -> Result<i32> {
    match cli.command {
        Some(Commands::Lint(mut args)) => {
            if args.paths.is_empty() {
                args.paths.push(PathBuf::from("."));
            }
            commands::lint_command(args, cli.config, cli.threads, use_colors)
        }

        Some(Commands::Rules { detailed, category }) => {
            commands::rules_command(detailed, category, cli.config)?;
            Ok(0)
        }

        Some(Commands::Config { action }) => {
            match action {
                ConfigAction::Init { format, force } => {
                    commands::config_init_command(format, force)?
                }
                ConfigAction::Schema => commands::config_schema_command()?,
                ConfigAction::Validate { path } => commands::config_validate_command(path)?,
            }
            Ok(0)
        }

        None => {
            // No subcommand provided, show help
            Cli::command().print_help()?;
            Ok(0)
        }
    }
}
