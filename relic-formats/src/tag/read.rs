//! Tag stream decoding.
//!
//! Each decoder makes two passes over its block: the fixed element parts
//! first (recording the length of every deferred payload as it goes), then
//! the deferred payloads in declaration order. Nested blocks are decoded
//! inline during the first pass and land in the arena before their parent.

use tracing::debug;

use crate::cursor::{BinaryCursor, ScalarRead};
use crate::error::{Error, ParseWarning};
use crate::tag::{
    Block, BlockBody, BlockId, FourCc, MovePosition, ParsedTag, Placement, Scenario, Squad,
    StartingLocation, TagFile,
};

/// Parse one tag file. The stream must hold exactly one root block; leftover
/// bytes after it are a non-fatal [`ParseWarning::TrailingData`].
pub fn parse_tag(input: &[u8]) -> Result<ParsedTag, Error> {
    let mut cur = BinaryCursor::new(input);
    let mut blocks = Vec::new();
    let root = read_block(&mut cur, &mut blocks, 0)?;

    let mut warnings = Vec::new();
    if cur.remaining() > 0 {
        warnings.push(ParseWarning::TrailingData {
            remaining: cur.remaining(),
        });
    }
    let tag = TagFile { blocks, root };
    warnings.extend(tag.validate_references());

    debug!(
        blocks = tag.blocks.len(),
        root_tag = %tag.block(tag.root).tag,
        warnings = warnings.len(),
        "parsed tag file"
    );
    Ok(ParsedTag { tag, warnings })
}

/// Well-formed files nest three levels (scenario, squads, squad children);
/// the limit only exists to turn a crafted stream of nested headers into an
/// error instead of unbounded recursion.
const MAX_BLOCK_DEPTH: usize = 64;

fn read_block(
    cur: &mut BinaryCursor<'_>,
    blocks: &mut Vec<Block>,
    depth: usize,
) -> Result<BlockId, Error> {
    if depth >= MAX_BLOCK_DEPTH {
        return Err(Error::DepthLimit {
            limit: MAX_BLOCK_DEPTH,
        });
    }
    let t = cur.take(4, "block tag")?;
    let tag = FourCc([t[0], t[1], t[2], t[3]]);
    let version = cur.next_u16()?;
    let element_count = cur.next_u32()? as usize;
    let element_size = cur.next_u32()? as usize;
    // Coarse pre-allocation guard; the scenario decoder has its own exact
    // count check, and every element is at least one byte everywhere else.
    if tag != FourCc::SCENARIO && element_count > cur.remaining() {
        return Err(Error::BadCount {
            what: "block elements",
            count: element_count as i64,
        });
    }

    let body = match tag {
        FourCc::SCENARIO => read_scenario(cur, blocks, element_count, depth)?,
        FourCc::OBJECT_NAMES | FourCc::SCENERY_PALETTE => read_palette(cur, element_count)?,
        FourCc::SCENERY => read_placements(cur, element_count)?,
        FourCc::SQUADS => read_squads(cur, blocks, element_count, depth)?,
        FourCc::MOVE_POSITIONS => read_move_positions(cur, element_count)?,
        FourCc::STARTING_LOCATIONS => read_starting_locations(cur, element_count)?,
        _ => read_raw(cur, element_count, element_size)?,
    };

    blocks.push(Block { tag, version, body });
    Ok(BlockId(blocks.len() as u32 - 1))
}

/// The root holds exactly one element: the four nested child blocks.
fn read_scenario(
    cur: &mut BinaryCursor<'_>,
    blocks: &mut Vec<Block>,
    element_count: usize,
    depth: usize,
) -> Result<BlockBody, Error> {
    if element_count != 1 {
        return Err(Error::BadCount {
            what: "scenario elements",
            count: element_count as i64,
        });
    }
    let object_names = read_block(cur, blocks, depth + 1)?;
    let scenery_palette = read_block(cur, blocks, depth + 1)?;
    let scenery = read_block(cur, blocks, depth + 1)?;
    let squads = read_block(cur, blocks, depth + 1)?;
    Ok(BlockBody::Scenario(Scenario {
        object_names,
        scenery_palette,
        scenery,
        squads,
    }))
}

/// Element is a single `name_len u16`; the name bytes are deferred. A zero
/// length defers no bytes and yields an empty name.
fn read_palette(cur: &mut BinaryCursor<'_>, element_count: usize) -> Result<BlockBody, Error> {
    let mut lengths = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        lengths.push(cur.next_u16()? as usize);
    }
    let mut names = Vec::with_capacity(element_count);
    for len in lengths {
        names.push(cur.next_str_exact(len)?);
    }
    Ok(BlockBody::Palette(names))
}

fn read_placements(cur: &mut BinaryCursor<'_>, element_count: usize) -> Result<BlockBody, Error> {
    let mut placements = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        placements.push(Placement {
            palette_index: cur.next_i16()?,
            name_index: cur.next_i16()?,
            position: read_vec3(cur)?,
            rotation: read_vec3(cur)?,
        });
    }
    Ok(BlockBody::Placements(placements))
}

/// Squad elements carry a deferred name, a team id and two nested blocks.
fn read_squads(
    cur: &mut BinaryCursor<'_>,
    blocks: &mut Vec<Block>,
    element_count: usize,
    depth: usize,
) -> Result<BlockBody, Error> {
    struct Fixed {
        name_len: usize,
        team: u16,
        move_positions: BlockId,
        starting_locations: BlockId,
    }

    let mut fixed = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        let name_len = cur.next_u16()? as usize;
        let team = cur.next_u16()?;
        let move_positions = read_block(cur, blocks, depth + 1)?;
        let starting_locations = read_block(cur, blocks, depth + 1)?;
        fixed.push(Fixed {
            name_len,
            team,
            move_positions,
            starting_locations,
        });
    }

    let mut squads = Vec::with_capacity(element_count);
    for f in fixed {
        squads.push(Squad {
            name: cur.next_str_exact(f.name_len)?,
            team: f.team,
            move_positions: f.move_positions,
            starting_locations: f.starting_locations,
        });
    }
    Ok(BlockBody::Squads(squads))
}

fn read_move_positions(
    cur: &mut BinaryCursor<'_>,
    element_count: usize,
) -> Result<BlockBody, Error> {
    let mut positions = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        positions.push(MovePosition {
            position: read_vec3(cur)?,
            facing: cur.next_f32()?,
        });
    }
    Ok(BlockBody::MovePositions(positions))
}

fn read_starting_locations(
    cur: &mut BinaryCursor<'_>,
    element_count: usize,
) -> Result<BlockBody, Error> {
    let mut locations = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        locations.push(StartingLocation {
            position: read_vec3(cur)?,
            sequence: cur.next_u16()?,
            flags: cur.next_u16()?,
        });
    }
    Ok(BlockBody::StartingLocations(locations))
}

/// Unknown fourcc: `element_size` must describe the whole element, so the
/// payload is exactly `element_count * element_size` bytes.
fn read_raw(
    cur: &mut BinaryCursor<'_>,
    element_count: usize,
    element_size: usize,
) -> Result<BlockBody, Error> {
    let in_bounds = element_count
        .checked_mul(element_size)
        .is_some_and(|total| total <= cur.remaining());
    if !in_bounds {
        return Err(Error::BadCount {
            what: "raw block bytes",
            count: element_count as i64,
        });
    }
    let mut elements = Vec::with_capacity(element_count);
    for _ in 0..element_count {
        elements.push(cur.take(element_size, "raw element")?.to_vec());
    }
    Ok(BlockBody::Raw(elements))
}

fn read_vec3(cur: &mut BinaryCursor<'_>) -> Result<[f32; 3], Error> {
    Ok([cur.next_f32()?, cur.next_f32()?, cur.next_f32()?])
}
