//! idlgen CLI - IDL compiler back-end driver
//!
//! Commands:
//! - `idlgen generate` - Generate Rust units from a parsed program
//! - `idlgen check` - Validate a program without writing output
//!
//! Schema errors exit with `10 + error_code`; any other failure exits with 1.

use clap::{Parser, Subcommand};
use idlgen_codegen::SchemaError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod check;
mod generate;

#[derive(Parser)]
#[command(name = "idlgen")]
#[command(author, version, about = "Rust back-end for the idlgen IDL compiler", long_about = None)]
struct Cli {
    /// Log generation progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the types, interfaces and implementation units
    Generate {
        /// Path to the program JSON emitted by the front-end
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for generated units
        #[arg(short, long)]
        output: PathBuf,

        /// Base name for the units (default: input file stem)
        #[arg(short, long)]
        base: Option<String>,

        /// Path to an idlgen.toml generator configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a program and report what would be generated
    Check {
        /// Path to the program JSON emitted by the front-end
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            input,
            output,
            base,
            config,
        } => {
            generate::run(&input, &output, base, config)?;
        }
        Commands::Check { input } => {
            check::run(&input)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SchemaError>() {
        Some(schema) => u8::try_from(10 + schema.error_code()).unwrap_or(1),
        None => 1,
    }
}
