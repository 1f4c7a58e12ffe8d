//! Tag-info command - parse a scenario tag file and print its block tree

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use relic_formats::tag::{parse_tag, BlockBody, BlockId, TagFile};
use serde::Serialize;

/// Arguments for the tag-info command
#[derive(Args)]
pub struct TagInfoArgs {
    /// Scenario tag file
    pub file: PathBuf,

    /// Emit the report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BlockReport {
    tag: String,
    version: u16,
    kind: &'static str,
    elements: usize,
    children: Vec<BlockReport>,
}

fn describe(tag: &TagFile, id: BlockId) -> BlockReport {
    let block = tag.block(id);
    let (kind, elements, children) = match &block.body {
        BlockBody::Scenario(s) => (
            "scenario",
            1,
            vec![s.object_names, s.scenery_palette, s.scenery, s.squads],
        ),
        BlockBody::Palette(names) => ("palette", names.len(), vec![]),
        BlockBody::Placements(p) => ("placements", p.len(), vec![]),
        BlockBody::Squads(squads) => (
            "squads",
            squads.len(),
            squads
                .iter()
                .flat_map(|s| [s.move_positions, s.starting_locations])
                .collect(),
        ),
        BlockBody::MovePositions(p) => ("move positions", p.len(), vec![]),
        BlockBody::StartingLocations(l) => ("starting locations", l.len(), vec![]),
        BlockBody::Raw(elements) => ("raw", elements.len(), vec![]),
    };
    BlockReport {
        tag: block.tag.to_string(),
        version: block.version,
        kind,
        elements,
        children: children.into_iter().map(|c| describe(tag, c)).collect(),
    }
}

fn print_tree(report: &BlockReport, depth: usize) {
    println!(
        "{:indent$}{} v{} - {} ({} elements)",
        "",
        report.tag,
        report.version,
        report.kind,
        report.elements,
        indent = depth * 2
    );
    for child in &report.children {
        print_tree(child, depth + 1);
    }
}

/// Execute the tag-info command
pub fn execute(args: TagInfoArgs) -> Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let parsed = parse_tag(&data)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    for warning in &parsed.warnings {
        tracing::warn!("{warning}");
    }

    let report = describe(&parsed.tag, parsed.tag.root);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== {} ===", args.file.display());
        print_tree(&report, 0);
    }
    Ok(())
}
