//! Info command - parse a model file and summarize its contents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relic_formats::{parse_model, ModelAsset};
use serde::Serialize;

use crate::ProfileArg;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Model file (.jmf), text or binary
    pub file: PathBuf,

    /// Game profile that gates the accepted version range
    #[arg(long, value_enum, default_value = "modern")]
    pub profile: ProfileArg,

    /// Emit the report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InfoReport {
    version: u32,
    checksum: u32,
    nodes: usize,
    materials: usize,
    markers: usize,
    regions: usize,
    vertices: usize,
    triangles: usize,
    xref_instances: usize,
    physics_shapes: usize,
    constraints: usize,
    lights: usize,
    warnings: Vec<String>,
}

fn report_for(asset: &ModelAsset, warnings: Vec<String>) -> InfoReport {
    InfoReport {
        version: asset.version,
        checksum: asset.checksum,
        nodes: asset.nodes.len(),
        materials: asset.materials.len(),
        markers: asset.markers.len(),
        regions: asset.regions.len(),
        vertices: asset.vertices.len(),
        triangles: asset.triangles.len(),
        xref_instances: asset.xref_instances.len(),
        physics_shapes: asset.spheres.len()
            + asset.boxes.len()
            + asset.capsules.len()
            + asset.convex_shapes.len(),
        constraints: asset.ragdolls.len()
            + asset.hinges.len()
            + asset.car_wheels.len()
            + asset.point_to_points.len()
            + asset.prismatics.len(),
        lights: asset.skylights.len(),
        warnings,
    }
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let parsed = parse_model(&data, args.profile.into())
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let warnings: Vec<String> = parsed.warnings.iter().map(|w| w.to_string()).collect();
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let report = report_for(&parsed.asset, warnings);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== {} ===", args.file.display());
    println!("  Version:    {}", report.version);
    println!("  Checksum:   {:#010x}", report.checksum);
    println!("  Nodes:      {}", report.nodes);
    println!("  Materials:  {}", report.materials);
    println!("  Markers:    {}", report.markers);
    println!("  Regions:    {}", report.regions);
    println!("  Vertices:   {}", report.vertices);
    println!("  Triangles:  {}", report.triangles);
    if report.xref_instances > 0 {
        println!("  Xrefs:      {}", report.xref_instances);
    }
    if report.physics_shapes > 0 {
        println!("  Shapes:     {}", report.physics_shapes);
    }
    if report.constraints > 0 {
        println!("  Constraints: {}", report.constraints);
    }
    if report.lights > 0 {
        println!("  Lights:     {}", report.lights);
    }
    Ok(())
}
