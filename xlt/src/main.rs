//! xlt CLI - A command-line tool for cross-language transpilation.
//!
//! This is the main entry point for the xlt CLI application.
//! It uses clap for argument parsing and dispatches to appropriate
//! command handlers based on user input.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    check::{run_check, CheckArgs},
    transpile::{run_transpile, TranspileArgs},
};
use config::Config;
use error::{Result, XltError};

/// xlt - A CLI tool for cross-language transpilation
///
/// xlt translates imperative programs between four source languages
/// (a Python-like scripting language, a C-family language, a C++-family
/// language, and a Java-like class-based language) through a shared
/// intermediate representation.
#[derive(Parser, Debug)]
#[command(name = "xlt")]
#[command(author = "Crate Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A CLI tool for cross-language transpilation", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "XLT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "XLT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "XLT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the xlt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Transpile a source file into the other known languages
    ///
    /// Parses each input file with its source language's front-end and
    /// writes the other three languages' emitted output as sibling files.
    Transpile(TranspileCommand),

    /// Run round-trip self-checks over a directory of source files
    ///
    /// Transpiles every recognized file in the input directory and
    /// reports which ones produced emitter errors, without writing
    /// any output files.
    Check(CheckCommand),
}

/// Arguments for the transpile subcommand.
#[derive(Parser, Debug)]
struct TranspileCommand {
    /// Input files to transpile
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory for generated targets (default: next to each input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language tag (scripting, c-family, cpp-family, class-based),
    /// overriding extension inference
    #[arg(short, long)]
    from: Option<String>,

    /// Overwrite existing target files
    #[arg(short = 'F', long)]
    force: bool,
}

/// Arguments for the check subcommand.
#[derive(Parser, Debug)]
struct CheckCommand {
    /// Input directory (default: from config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Stop scanning at the first file whose check reports an error
    #[arg(long)]
    stop_on_first_error: bool,
}

/// Main entry point for the xlt CLI.
///
/// Parses command-line arguments, initializes logging, loads configuration,
/// and dispatches to the appropriate command handler.
///
/// # Returns
/// * `Result<()>` - Success or an error
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.no_color)?;

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Execute the selected command
    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system.
///
/// # Arguments
/// * `verbose` - Whether to enable verbose logging
/// * `no_color` - Whether to disable colored output
///
/// # Returns
/// * `Result<()>` - Success or an error
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber =
        fmt::layer().with_ansi(!no_color).with_target(false).with_thread_ids(false).with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| XltError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// # Arguments
/// * `config_path` - Optional path to configuration file
///
/// # Returns
/// * `Result<Config>` - The loaded configuration or an error
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
///
/// # Arguments
/// * `command` - The command to execute
/// * `verbose` - Whether verbose output is enabled
/// * `config` - The application configuration
///
/// # Returns
/// * `Result<()>` - Success or an error
fn execute_command(command: Commands, verbose: bool, config: Config) -> Result<()> {
    match command {
        Commands::Transpile(args) => execute_transpile(args, verbose, config),
        Commands::Check(args) => execute_check(args, verbose, config),
    }
}

/// Execute the transpile command.
fn execute_transpile(args: TranspileCommand, verbose: bool, _config: Config) -> Result<()> {
    let transpile_args =
        TranspileArgs { input: args.input, output: args.output, from: args.from, verbose, force: args.force };
    run_transpile(transpile_args)
}

/// Execute the check command.
fn execute_check(args: CheckCommand, verbose: bool, _config: Config) -> Result<()> {
    let check_args = CheckArgs { input: args.input, verbose, stop_on_first_error: args.stop_on_first_error };
    run_check(check_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_transpile() {
        let cli = Cli::parse_from(["xlt", "transpile", "input.py"]);
        assert!(matches!(cli.command, Commands::Transpile(_)));
    }

    #[test]
    fn test_cli_parse_transpile_with_from() {
        let cli = Cli::parse_from(["xlt", "transpile", "input.txt", "--from", "scripting"]);
        if let Commands::Transpile(args) = cli.command {
            assert_eq!(args.from, Some("scripting".to_string()));
        } else {
            panic!("Expected Transpile command");
        }
    }

    #[test]
    fn test_cli_parse_transpile_with_output() {
        let cli = Cli::parse_from(["xlt", "transpile", "input.py", "--output", "/out"]);
        if let Commands::Transpile(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("/out")));
        } else {
            panic!("Expected Transpile command");
        }
    }

    #[test]
    fn test_cli_parse_transpile_with_force() {
        let cli = Cli::parse_from(["xlt", "transpile", "input.py", "--force"]);
        if let Commands::Transpile(args) = cli.command {
            assert!(args.force);
        } else {
            panic!("Expected Transpile command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["xlt", "check"]);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_check_with_input() {
        let cli = Cli::parse_from(["xlt", "check", "--input", "/input"]);
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.input, Some(PathBuf::from("/input")));
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_check_with_stop_on_first_error() {
        let cli = Cli::parse_from(["xlt", "check", "--stop-on-first-error"]);
        if let Commands::Check(args) = cli.command {
            assert!(args.stop_on_first_error);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_global_verbose() {
        let cli = Cli::parse_from(["xlt", "--verbose", "check"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_global_config() {
        let cli = Cli::parse_from(["xlt", "--config", "/path/to/config.toml", "check"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_parse_global_no_color() {
        let cli = Cli::parse_from(["xlt", "--no-color", "check"]);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_version_flag() {
        let cli = Cli::parse_from(["xlt", "check"]);
        assert!(matches!(cli.command, Commands::Check(_)));
        assert_eq!(cli.verbose, false);
    }
}
