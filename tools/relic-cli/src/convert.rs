//! Convert command - re-encode a model file
//!
//! One pass covers every rewrite need: version up/downgrades, text/binary
//! switches, verbosity, checksum stamping and optional vertex welding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relic_formats::model::{node_checksum, optimize, NodeChecksumFn};
use relic_formats::{parse_model, write_model, WriteOptions};

use crate::ProfileArg;

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// Input model file (.jmf), text or binary
    pub input: PathBuf,

    /// Output model file
    pub output: PathBuf,

    /// Target format version (defaults to the input's version)
    #[arg(long)]
    pub version: Option<u32>,

    /// Write the binary encoding instead of text
    #[arg(long)]
    pub binary: bool,

    /// Write section banner comments (text only)
    #[arg(long)]
    pub comments: bool,

    /// Write blank separator lines between sections (text only)
    #[arg(long)]
    pub blank_lines: bool,

    /// Override the text decimal precision
    #[arg(long)]
    pub precision: Option<u8>,

    /// Stamp the node hierarchy checksum (otherwise written as 0)
    #[arg(long)]
    pub checksum: bool,

    /// Weld duplicate vertices before writing
    #[arg(long)]
    pub optimize: bool,

    /// Game profile that gates the accepted input version range
    #[arg(long, value_enum, default_value = "modern")]
    pub profile: ProfileArg,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let parsed = parse_model(&data, args.profile.into())
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    for warning in &parsed.warnings {
        tracing::warn!("{warning}");
    }

    let mut asset = parsed.asset;
    if args.optimize {
        let before = asset.vertices.len();
        let (vertices, triangles) = optimize(&asset.vertices, &asset.triangles);
        tracing::info!("Welded {} -> {} vertices", before, vertices.len());
        asset.vertices = vertices;
        asset.triangles = triangles;
    }

    let target = args.version.unwrap_or(asset.version);
    let opts = WriteOptions {
        binary: args.binary,
        comments: args.comments,
        blank_lines: args.blank_lines,
        precision: args.precision,
        checksum: args.checksum.then_some(node_checksum as NodeChecksumFn),
    };
    let bytes = write_model(&asset, target, &opts)
        .with_context(|| format!("Failed to encode at version {target}"))?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        "Converted {} (v{}) -> {} (v{target}, {})",
        args.input.display(),
        asset.version,
        args.output.display(),
        if args.binary { "binary" } else { "text" },
    );
    Ok(())
}
