//! Relic CLI - inspect and convert game asset files
//!
//! # Commands
//!
//! - `relic info` - Parse a model file and print a summary
//! - `relic convert` - Re-encode a model file (target version, text/binary,
//!   verbosity, checksum, optional vertex welding)
//! - `relic optimize` - Weld duplicate vertices in a model file
//! - `relic tag-info` - Parse a scenario tag file and print its block tree
//!
//! # Usage
//!
//! ```bash
//! # Summarize a model, gated to what the classic game accepts
//! relic info cyborg.jmf --profile classic
//!
//! # Upgrade a model to the newest revision, binary encoding, with checksum
//! relic convert cyborg.jmf cyborg_new.jmf --version 8213 --binary --checksum
//!
//! # Weld duplicate vertices in place of a separate pipeline step
//! relic optimize cyborg.jmf cyborg_opt.jmf
//!
//! # Machine-readable report
//! relic info cyborg.jmf --json
//! ```

mod convert;
mod info;
mod optimize;
mod tag_info;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use relic_formats::GameProfile;

/// Relic CLI - inspect and convert game asset files
#[derive(Parser)]
#[command(name = "relic")]
#[command(about = "Inspect and convert relic asset files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a model file and print a summary
    Info(info::InfoArgs),

    /// Re-encode a model file (target version, encoding, verbosity)
    Convert(convert::ConvertArgs),

    /// Weld duplicate vertices in a model file
    Optimize(optimize::OptimizeArgs),

    /// Parse a scenario tag file and print its block tree
    TagInfo(tag_info::TagInfoArgs),
}

/// Game profile selector shared by the model subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Classic,
    Enhanced,
    Modern,
}

impl From<ProfileArg> for GameProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Classic => GameProfile::Classic,
            ProfileArg::Enhanced => GameProfile::Enhanced,
            ProfileArg::Modern => GameProfile::Modern,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => info::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Optimize(args) => optimize::execute(args),
        Commands::TagInfo(args) => tag_info::execute(args),
    }
}
