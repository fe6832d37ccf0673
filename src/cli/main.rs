//! arch-model command line interface

use arch_model_sdk::cli::commands::{ValidateArgs, handle_rules, handle_validate};
use arch_model_sdk::cli::error::EXIT_INVALID;
use arch_model_sdk::cli::{OutputFormat, logging};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "arch-model")]
#[command(about = "Validate cross-layer references in architecture models", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more layer documents as a single model
    Validate {
        /// Layer document files (YAML or JSON); use `-` for stdin
        #[arg(required = true)]
        files: Vec<String>,

        /// Validator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Validate references in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// List the relationship rules of the catalog
    Rules {
        /// Only show rules for this source entity type
        #[arg(long)]
        source_type: Option<String>,

        /// Validator configuration (TOML) with custom types and rules
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            files,
            config,
            format,
            strict,
            parallel,
        } => handle_validate(&ValidateArgs {
            inputs: files,
            config,
            format,
            strict,
            parallel,
        }),
        Commands::Rules {
            source_type,
            config,
            format,
        } => handle_rules(source_type.as_deref(), config.as_deref(), format).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID as u8),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
