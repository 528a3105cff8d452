use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    format::{self, FormatArgs},
    generate::{self, GenerateArgs},
    scheme::{self, SchemeArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pcg", about = "Coupling configuration generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the configuration document for a topology.
    Generate(GenerateArgs),
    /// Print the synthesized coupling scheme as canonical JSON.
    Scheme(SchemeArgs),
    /// Re-canonicalize existing configuration files in place.
    ///
    /// Exits with 1 when a file cannot be read or parsed, otherwise with 2
    /// when any file was rewritten.
    Format(FormatArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Generate(args) => generate::run(&args).map(|()| ExitCode::SUCCESS),
        Command::Scheme(args) => scheme::run(&args).map(|()| ExitCode::SUCCESS),
        Command::Format(args) => format::run(&args),
        Command::Version(args) => version::run(&args).map(|()| ExitCode::SUCCESS),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pcg=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
