//! Optimize command - weld duplicate vertices in a model file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relic_formats::model::optimize;
use relic_formats::{parse_model, write_model, WriteOptions};

use crate::ProfileArg;

/// Arguments for the optimize command
#[derive(Args)]
pub struct OptimizeArgs {
    /// Input model file (.jmf), text or binary
    pub input: PathBuf,

    /// Output model file (same version as the input)
    pub output: PathBuf,

    /// Write the binary encoding instead of text
    #[arg(long)]
    pub binary: bool,

    /// Game profile that gates the accepted input version range
    #[arg(long, value_enum, default_value = "modern")]
    pub profile: ProfileArg,
}

/// Execute the optimize command
pub fn execute(args: OptimizeArgs) -> Result<()> {
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let parsed = parse_model(&data, args.profile.into())
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    for warning in &parsed.warnings {
        tracing::warn!("{warning}");
    }

    let mut asset = parsed.asset;
    let before = asset.vertices.len();
    let (vertices, triangles) = optimize(&asset.vertices, &asset.triangles);
    let after = vertices.len();
    asset.vertices = vertices;
    asset.triangles = triangles;

    let opts = WriteOptions {
        binary: args.binary,
        ..WriteOptions::default()
    };
    let bytes = write_model(&asset, asset.version, &opts)?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        "Welded {before} -> {after} vertices ({} removed)",
        before - after
    );
    Ok(())
}
