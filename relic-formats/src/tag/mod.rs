//! Scenario tag container.
//!
//! A tag file is a tree of blocks in one binary stream. Every block starts
//! with a 14-byte header:
//!
//! ```text
//! # Layout
//! tag            [u8; 4]   fourcc
//! version        u16
//! element_count  u32
//! element_size   u32       size of one element's flat fields only
//! ```
//!
//! followed by `element_count` fixed element parts (which may inline nested
//! child blocks) and then the block's deferred variable-length payloads in
//! declaration order. Known fourccs decode into typed bodies; anything else
//! is kept as raw elements sized by `element_size`.
//!
//! Blocks live in a single arena owned by [`TagFile`]; nesting is expressed
//! with [`BlockId`] indices so the whole tree drops at once.

use std::fmt;

use crate::error::ParseWarning;

mod read;

pub use read::parse_tag;

/// Four-character block tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const SCENARIO: FourCc = FourCc(*b"scnr");
    pub const OBJECT_NAMES: FourCc = FourCc(*b"obnm");
    pub const SCENERY_PALETTE: FourCc = FourCc(*b"scpl");
    pub const SCENERY: FourCc = FourCc(*b"scen");
    pub const SQUADS: FourCc = FourCc(*b"sqad");
    pub const MOVE_POSITIONS: FourCc = FourCc(*b"mvps");
    pub const STARTING_LOCATIONS: FourCc = FourCc(*b"slct");
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() { b as char } else { '.' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Index into the [`TagFile`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(pub u32);

/// One decoded block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tag: FourCc,
    pub version: u16,
    pub body: BlockBody,
}

/// Typed bodies for the known fourccs, raw bytes for the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Scenario(Scenario),
    /// `obnm` / `scpl`: a list of names.
    Palette(Vec<String>),
    Placements(Vec<Placement>),
    Squads(Vec<Squad>),
    MovePositions(Vec<MovePosition>),
    StartingLocations(Vec<StartingLocation>),
    /// Unknown fourcc: `element_size` bytes per element, undecoded.
    Raw(Vec<Vec<u8>>),
}

/// Root block body: the four nested child blocks of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub object_names: BlockId,
    pub scenery_palette: BlockId,
    pub scenery: BlockId,
    pub squads: BlockId,
}

/// A placed scenery object. Palette and name references are index-only;
/// resolution happens at query time via [`TagFile::palette_name`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub palette_index: i16,
    pub name_index: i16,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Squad {
    pub name: String,
    pub team: u16,
    pub move_positions: BlockId,
    pub starting_locations: BlockId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePosition {
    pub position: [f32; 3],
    pub facing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartingLocation {
    pub position: [f32; 3],
    pub sequence: u16,
    pub flags: u16,
}

/// Arena of decoded blocks plus the root id.
#[derive(Debug, Clone, PartialEq)]
pub struct TagFile {
    pub blocks: Vec<Block>,
    pub root: BlockId,
}

/// A parsed tag file plus the non-fatal anomalies found along the way.
#[derive(Debug)]
pub struct ParsedTag {
    pub tag: TagFile,
    pub warnings: Vec<ParseWarning>,
}

impl TagFile {
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    /// Resolve a late-bound palette reference. `None` for a negative or
    /// out-of-range index, or when `palette` is not a palette block.
    pub fn palette_name(&self, palette: BlockId, index: i16) -> Option<&str> {
        let BlockBody::Palette(names) = &self.block(palette).body else {
            return None;
        };
        let index = usize::try_from(index).ok()?;
        names.get(index).map(String::as_str)
    }

    /// Report placement indices that do not resolve against their palettes.
    /// Advisory: a tag with dangling indices is still usable.
    pub fn validate_references(&self) -> Vec<ParseWarning> {
        let mut warnings = Vec::new();
        let Some(scenario) = self.scenario() else {
            return warnings;
        };
        let BlockBody::Placements(placements) = &self.block(scenario.scenery).body else {
            return warnings;
        };
        for placement in placements {
            for (index, palette, collection) in [
                (
                    placement.palette_index,
                    scenario.scenery_palette,
                    "scenery palette",
                ),
                (placement.name_index, scenario.object_names, "object names"),
            ] {
                if index >= 0 && self.palette_name(palette, index).is_none() {
                    warnings.push(ParseWarning::MissingReference {
                        kind: "Placement",
                        name: index.to_string(),
                        collection,
                    });
                }
            }
        }
        warnings
    }

    fn scenario(&self) -> Option<Scenario> {
        match &self.block(self.root).body {
            BlockBody::Scenario(s) => Some(*s),
            _ => None,
        }
    }
}
