//! wirebind CLI orchestrator
//!
//! This binary provides the main entry point for wirebind,
//! offering subcommands for header generation and configuration setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use wirebind_cli::{generate, init_config, init_logging, resolve_config, Overrides};

/// Command-line interface configuration for wirebind.
#[derive(Parser, Debug)]
#[command(
    name = "wirebind",
    about = "Generate typed C++ bindings from X protocol descriptions",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

/// Available wirebind commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate headers and method includes from a protocol description
    Generate {
        /// Configuration file (defaults to the user config file when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Protocol description (JSON)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Log level (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
        /// Write the operations that generated even when others failed
        #[arg(long)]
        keep_going: bool,
    },
    /// Write the default configuration file
    InitConfig {
        /// Where to write it (defaults to the user config file)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Main entry point for the wirebind application.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.cmd {
        Commands::Generate { config, input, output, log_level, keep_going } => {
            let overrides = Overrides { input, output, log_level };
            resolve_config(config.as_deref(), &overrides).and_then(|config| {
                init_logging(&config)?;
                let report = generate(&config, keep_going)?;
                println!(
                    "[wirebind] generated {} operation(s) into {} ({} failed)",
                    report.outputs.len(),
                    config.output.dir.display(),
                    report.failure_count()
                );
                Ok(())
            })
        }
        Commands::InitConfig { path } => init_config(path).map(|path| {
            println!("[wirebind] wrote default configuration to {}", path.display());
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wirebind failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
