//! The per-revision codecs, grouped by era.
//!
//! Each unit struct below is one complete [`VersionCodec`]: its `decode` and
//! `encode` spell out the full section sequence for that revision, built from
//! the shared record layouts in `codec.rs`. Reading a codec top to bottom is
//! reading that revision's file layout.

use crate::cursor::{ScalarRead, ScalarWrite};
use crate::error::Error;
use crate::model::codec::{read_count, WriteOptions};
use crate::model::types::{ModelNode, NodeTransform};
use crate::model::ModelAsset;

mod classic;
mod enhanced;
mod modern;

pub(crate) use classic::{V8197, V8198, V8199, V8200};
pub(crate) use enhanced::{V8201, V8202, V8203, V8204, V8205, V8206, V8207, V8208, V8209, V8210};
pub(crate) use modern::{V8211, V8212, V8213};

/// The checksum slot directly follows the version in every revision.
fn read_checksum(cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
    asset.checksum = cur.next_int()? as u32;
    Ok(())
}

fn write_checksum(w: &mut dyn ScalarWrite, asset: &ModelAsset, opts: &WriteOptions) {
    let checksum = opts.checksum.map(|f| f(&asset.nodes)).unwrap_or(0);
    w.put_int(checksum as i64);
}

/// Optional banner between sections. The writer decides whether either call
/// produces output (both are no-ops in binary mode and gated by the
/// verbosity flags in text mode).
fn section(w: &mut dyn ScalarWrite, banner: &str) {
    w.blank_line();
    w.comment(banner);
}

/// The node section fills two index-aligned collections, so it cannot go
/// through `read_counted`.
fn read_nodes(
    cur: &mut dyn ScalarRead,
    asset: &mut ModelAsset,
    read_one: fn(&mut dyn ScalarRead) -> Result<(ModelNode, NodeTransform), Error>,
) -> Result<(), Error> {
    let count = read_count(cur, "nodes")?;
    asset.nodes.reserve(count);
    asset.transforms.reserve(count);
    for _ in 0..count {
        let (node, transform) = read_one(cur)?;
        asset.nodes.push(node);
        asset.transforms.push(transform);
    }
    Ok(())
}

fn write_nodes(
    w: &mut dyn ScalarWrite,
    asset: &ModelAsset,
    write_one: fn(&mut dyn ScalarWrite, &ModelNode, &NodeTransform),
) {
    w.put_int(asset.nodes.len() as i64);
    for (node, transform) in asset.nodes.iter().zip(&asset.transforms) {
        write_one(w, node, transform);
    }
}
