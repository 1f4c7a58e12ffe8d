//! Version dispatch and the shared record layouts.
//!
//! Every supported revision gets its own [`VersionCodec`]: a complete,
//! self-contained description of that file layout. There is deliberately no
//! inheritance chain between versions; a "diff from previous version"
//! abstraction would mask silent incompatibilities. What the codecs share
//! are the leaf record layouts below (a layout like "vertex with paired
//! influences" is byte-identical across the revisions that use it), named by
//! what they encode, not by which version first used them.
//!
//! Layout ladder, one change per revision:
//!
//! | version | change |
//! |---------|--------|
//! | 8197    | base: child/sibling nodes, name-only materials |
//! | 8198    | materials gain texture path |
//! | 8199    | vertices gain a second influence |
//! | 8200    | markers gain radius |
//! | 8201    | xref instances + markers |
//! | 8202    | materials gain permutation/region |
//! | 8203    | vertices gain color |
//! | 8204    | variable UV count |
//! | 8205    | parent-based nodes, weighted influence lists, regionless triangles, named xrefs, 10-digit text precision |
//! | 8206    | markers parent-relative |
//! | 8207    | materials gain LOD |
//! | 8208    | spheres, boxes |
//! | 8209    | capsules, convex shapes |
//! | 8210    | ragdolls, hinges |
//! | 8211    | car wheels, point-to-points, prismatics |
//! | 8212    | bounding spheres |
//! | 8213    | skylights |

use glam::Vec3;
use smallvec::smallvec;

use crate::cursor::{ScalarRead, ScalarWrite};
use crate::error::Error;
use crate::model::graph::{NodeChecksumFn, NodeGraphEncoding};
use crate::model::types::*;
use crate::model::versions;
use crate::model::ModelAsset;

/// Oldest supported revision.
pub const VERSION_MIN: u32 = 8197;
/// Newest supported revision.
pub const VERSION_MAX: u32 = 8213;
/// Text output switches from 6 to 10 decimal digits at this revision.
pub const PRECISION_SWITCH_VERSION: u32 = 8205;

/// Default text decimal precision for a revision.
pub fn default_precision(version: u32) -> u8 {
    if version >= PRECISION_SWITCH_VERSION {
        10
    } else {
        6
    }
}

/// Per-call export options. Precision is threaded explicitly rather than
/// held in process-global state, so two exports at different precisions can
/// never interleave.
#[derive(Clone, Default)]
pub struct WriteOptions {
    /// Emit the binary encoding (magic `JMFB`) instead of text.
    pub binary: bool,
    /// Emit `;`-prefixed section banners (text only).
    pub comments: bool,
    /// Emit blank separator lines between sections (text only).
    pub blank_lines: bool,
    /// Text decimal precision override; `None` uses the version default.
    pub precision: Option<u8>,
    /// Checksum over the node hierarchy; `None` writes 0.
    pub checksum: Option<NodeChecksumFn>,
}

/// A complete decode/encode pair for one format revision.
pub trait VersionCodec: Sync {
    fn version(&self) -> u32;

    /// Which skeleton link representation this revision stores.
    fn node_encoding(&self) -> NodeGraphEncoding;

    /// Decode everything after the version field into `asset`.
    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error>;

    /// Encode everything after the version field.
    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error>;
}

/// Static dispatch table; the single place "is this version supported"
/// is answered.
static CODECS: &[&dyn VersionCodec] = &[
    &versions::V8197,
    &versions::V8198,
    &versions::V8199,
    &versions::V8200,
    &versions::V8201,
    &versions::V8202,
    &versions::V8203,
    &versions::V8204,
    &versions::V8205,
    &versions::V8206,
    &versions::V8207,
    &versions::V8208,
    &versions::V8209,
    &versions::V8210,
    &versions::V8211,
    &versions::V8212,
    &versions::V8213,
];

pub(crate) fn codec_for(version: u32) -> Option<&'static dyn VersionCodec> {
    CODECS.iter().copied().find(|c| c.version() == version)
}

// ============================================================================
// Count-prefixed sections
// ============================================================================

/// Read a count field, rejecting negatives and counts that cannot possibly
/// fit in the remaining stream (every element consumes at least one
/// token/byte).
pub(crate) fn read_count(cur: &mut dyn ScalarRead, what: &'static str) -> Result<usize, Error> {
    let count = cur.next_int()?;
    if count < 0 || count as u64 > cur.remaining() as u64 {
        return Err(Error::BadCount { what, count });
    }
    Ok(count as usize)
}

pub(crate) fn read_counted<T>(
    cur: &mut dyn ScalarRead,
    what: &'static str,
    mut read_one: impl FnMut(&mut dyn ScalarRead) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let count = read_count(cur, what)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read_one(cur)?);
    }
    Ok(items)
}

pub(crate) fn write_counted<T>(
    w: &mut dyn ScalarWrite,
    items: &[T],
    mut write_one: impl FnMut(&mut dyn ScalarWrite, &T),
) {
    w.put_int(items.len() as i64);
    for item in items {
        write_one(w, item);
    }
}

fn next_index(cur: &mut dyn ScalarRead) -> Result<i32, Error> {
    Ok(cur.next_int()? as i32)
}

// ============================================================================
// Nodes
// ============================================================================

/// N1 (8197–8204): name, child, sibling, rotation, translation.
pub(crate) fn read_node_child_sibling(
    cur: &mut dyn ScalarRead,
) -> Result<(ModelNode, NodeTransform), Error> {
    let name = cur.next_str()?;
    let child = next_index(cur)?;
    let sibling = next_index(cur)?;
    let rotation = cur.next_quat()?;
    let translation = cur.next_vec3()?;
    Ok((
        ModelNode {
            name,
            parent: NO_INDEX,
            child,
            sibling,
        },
        NodeTransform {
            rotation,
            translation,
        },
    ))
}

pub(crate) fn write_node_child_sibling(
    w: &mut dyn ScalarWrite,
    node: &ModelNode,
    transform: &NodeTransform,
) {
    w.put_str(&node.name);
    w.put_int(node.child as i64);
    w.put_int(node.sibling as i64);
    w.put_quat(transform.rotation);
    w.put_vec3(transform.translation);
}

/// N2 (8205+): name, parent, rotation, translation.
pub(crate) fn read_node_parented(
    cur: &mut dyn ScalarRead,
) -> Result<(ModelNode, NodeTransform), Error> {
    let name = cur.next_str()?;
    let parent = next_index(cur)?;
    let rotation = cur.next_quat()?;
    let translation = cur.next_vec3()?;
    Ok((
        ModelNode {
            name,
            parent,
            child: NO_INDEX,
            sibling: NO_INDEX,
        },
        NodeTransform {
            rotation,
            translation,
        },
    ))
}

pub(crate) fn write_node_parented(
    w: &mut dyn ScalarWrite,
    node: &ModelNode,
    transform: &NodeTransform,
) {
    w.put_str(&node.name);
    w.put_int(node.parent as i64);
    w.put_quat(transform.rotation);
    w.put_vec3(transform.translation);
}

// ============================================================================
// Materials
// ============================================================================

/// T0 (8197): name only.
pub(crate) fn read_material_name_only(cur: &mut dyn ScalarRead) -> Result<Material, Error> {
    Ok(Material {
        name: cur.next_str()?,
        ..Material::default()
    })
}

pub(crate) fn write_material_name_only(w: &mut dyn ScalarWrite, m: &Material) {
    w.put_str(&m.name);
}

/// T1 (8198–8201): name, texture path.
pub(crate) fn read_material_textured(cur: &mut dyn ScalarRead) -> Result<Material, Error> {
    Ok(Material {
        name: cur.next_str()?,
        texture_path: Some(cur.next_str()?),
        ..Material::default()
    })
}

pub(crate) fn write_material_textured(w: &mut dyn ScalarWrite, m: &Material) {
    w.put_str(&m.name);
    w.put_str(m.texture_path.as_deref().unwrap_or("<none>"));
}

/// T2 (8202–8206): name, texture path, permutation, region.
pub(crate) fn read_material_grouped(cur: &mut dyn ScalarRead) -> Result<Material, Error> {
    Ok(Material {
        name: cur.next_str()?,
        texture_path: Some(cur.next_str()?),
        lod: None,
        permutation: Some(cur.next_str()?),
        region: Some(cur.next_str()?),
    })
}

pub(crate) fn write_material_grouped(w: &mut dyn ScalarWrite, m: &Material) {
    w.put_str(&m.name);
    w.put_str(m.texture_path.as_deref().unwrap_or("<none>"));
    w.put_str(m.permutation.as_deref().unwrap_or("Default"));
    w.put_str(m.region.as_deref().unwrap_or("Default"));
}

/// T3 (8207+): name, texture path, LOD, permutation, region.
pub(crate) fn read_material_lod(cur: &mut dyn ScalarRead) -> Result<Material, Error> {
    Ok(Material {
        name: cur.next_str()?,
        texture_path: Some(cur.next_str()?),
        lod: Some(next_index(cur)?),
        permutation: Some(cur.next_str()?),
        region: Some(cur.next_str()?),
    })
}

pub(crate) fn write_material_lod(w: &mut dyn ScalarWrite, m: &Material) {
    w.put_str(&m.name);
    w.put_str(m.texture_path.as_deref().unwrap_or("<none>"));
    w.put_int(m.lod.unwrap_or(NO_INDEX) as i64);
    w.put_str(m.permutation.as_deref().unwrap_or("Default"));
    w.put_str(m.region.as_deref().unwrap_or("Default"));
}

// ============================================================================
// Markers
// ============================================================================

/// M1 (8197–8199): name, region, rotation, translation.
pub(crate) fn read_marker_regioned(cur: &mut dyn ScalarRead) -> Result<Marker, Error> {
    Ok(Marker {
        name: cur.next_str()?,
        region: next_index(cur)?,
        parent: NO_INDEX,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        radius: 0.0,
    })
}

pub(crate) fn write_marker_regioned(w: &mut dyn ScalarWrite, m: &Marker) {
    w.put_str(&m.name);
    w.put_int(m.region as i64);
    w.put_quat(m.rotation);
    w.put_vec3(m.translation);
}

/// M2 (8200–8205): M1 plus radius.
pub(crate) fn read_marker_radius(cur: &mut dyn ScalarRead) -> Result<Marker, Error> {
    Ok(Marker {
        name: cur.next_str()?,
        region: next_index(cur)?,
        parent: NO_INDEX,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        radius: cur.next_float()?,
    })
}

pub(crate) fn write_marker_radius(w: &mut dyn ScalarWrite, m: &Marker) {
    w.put_str(&m.name);
    w.put_int(m.region as i64);
    w.put_quat(m.rotation);
    w.put_vec3(m.translation);
    w.put_float(m.radius);
}

/// M3 (8206+): parent-relative, no region.
pub(crate) fn read_marker_parented(cur: &mut dyn ScalarRead) -> Result<Marker, Error> {
    Ok(Marker {
        name: cur.next_str()?,
        region: NO_INDEX,
        parent: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        radius: cur.next_float()?,
    })
}

pub(crate) fn write_marker_parented(w: &mut dyn ScalarWrite, m: &Marker) {
    w.put_str(&m.name);
    w.put_int(m.parent as i64);
    w.put_quat(m.rotation);
    w.put_vec3(m.translation);
    w.put_float(m.radius);
}

// ============================================================================
// Regions
// ============================================================================

pub(crate) fn read_region(cur: &mut dyn ScalarRead) -> Result<Region, Error> {
    Ok(Region {
        name: cur.next_str()?,
    })
}

pub(crate) fn write_region(w: &mut dyn ScalarWrite, r: &Region) {
    w.put_str(&r.name);
}

// ============================================================================
// Vertices
// ============================================================================

fn primary_node(v: &Vertex) -> i32 {
    v.influences.first().map(|i| i.node).unwrap_or(NO_INDEX)
}

fn first_uv(v: &Vertex) -> [f32; 2] {
    v.uvs.first().copied().unwrap_or([0.0, 0.0])
}

/// L1 (8197–8198): node0, position, normal, u, v. Weight is implicitly 1.
pub(crate) fn read_vertex_single_influence(cur: &mut dyn ScalarRead) -> Result<Vertex, Error> {
    let node0 = next_index(cur)?;
    let position = cur.next_vec3()?;
    let normal = cur.next_vec3()?;
    let u = cur.next_float()?;
    let v = cur.next_float()?;
    Ok(Vertex {
        position,
        normal,
        color: None,
        influences: smallvec![NodeInfluence {
            node: node0,
            weight: 1.0
        }],
        uvs: vec![[u, v]],
    })
}

pub(crate) fn write_vertex_single_influence(w: &mut dyn ScalarWrite, v: &Vertex) {
    w.put_int(primary_node(v) as i64);
    w.put_vec3(v.position);
    w.put_vec3(v.normal);
    let uv = first_uv(v);
    w.put_float(uv[0]);
    w.put_float(uv[1]);
}

/// Shared tail for L2/L3: the secondary influence pair. `node1 == -1`
/// collapses to a single full-weight influence; otherwise node0's weight is
/// the complement of node1's.
fn influences_from_pair(node0: i32, node1: i32, weight1: f32) -> Influences {
    if node1 == NO_INDEX {
        smallvec![NodeInfluence {
            node: node0,
            weight: 1.0
        }]
    } else {
        smallvec![
            NodeInfluence {
                node: node0,
                weight: 1.0 - weight1
            },
            NodeInfluence {
                node: node1,
                weight: weight1
            },
        ]
    }
}

fn pair_from_influences(v: &Vertex) -> (i32, f32) {
    v.influences
        .get(1)
        .map(|i| (i.node, i.weight))
        .unwrap_or((NO_INDEX, 0.0))
}

/// L2 (8199–8202): node0, position, normal, node1, node1_weight, u, v.
pub(crate) fn read_vertex_paired_influence(cur: &mut dyn ScalarRead) -> Result<Vertex, Error> {
    let node0 = next_index(cur)?;
    let position = cur.next_vec3()?;
    let normal = cur.next_vec3()?;
    let node1 = next_index(cur)?;
    let weight1 = cur.next_float()?;
    let u = cur.next_float()?;
    let v = cur.next_float()?;
    Ok(Vertex {
        position,
        normal,
        color: None,
        influences: influences_from_pair(node0, node1, weight1),
        uvs: vec![[u, v]],
    })
}

pub(crate) fn write_vertex_paired_influence(w: &mut dyn ScalarWrite, v: &Vertex) {
    let (node1, weight1) = pair_from_influences(v);
    w.put_int(primary_node(v) as i64);
    w.put_vec3(v.position);
    w.put_vec3(v.normal);
    w.put_int(node1 as i64);
    w.put_float(weight1);
    let uv = first_uv(v);
    w.put_float(uv[0]);
    w.put_float(uv[1]);
}

/// L3 (8203): L2 plus a color between normal and the second influence.
pub(crate) fn read_vertex_colored(cur: &mut dyn ScalarRead) -> Result<Vertex, Error> {
    let node0 = next_index(cur)?;
    let position = cur.next_vec3()?;
    let normal = cur.next_vec3()?;
    let color = cur.next_vec3()?;
    let node1 = next_index(cur)?;
    let weight1 = cur.next_float()?;
    let u = cur.next_float()?;
    let v = cur.next_float()?;
    Ok(Vertex {
        position,
        normal,
        color: Some(color),
        influences: influences_from_pair(node0, node1, weight1),
        uvs: vec![[u, v]],
    })
}

pub(crate) fn write_vertex_colored(w: &mut dyn ScalarWrite, v: &Vertex) {
    let (node1, weight1) = pair_from_influences(v);
    w.put_int(primary_node(v) as i64);
    w.put_vec3(v.position);
    w.put_vec3(v.normal);
    w.put_vec3(v.color.unwrap_or(Vec3::ZERO));
    w.put_int(node1 as i64);
    w.put_float(weight1);
    let uv = first_uv(v);
    w.put_float(uv[0]);
    w.put_float(uv[1]);
}

/// L4 (8204): L3 with a count-prefixed UV list instead of a single pair.
pub(crate) fn read_vertex_multi_uv(cur: &mut dyn ScalarRead) -> Result<Vertex, Error> {
    let node0 = next_index(cur)?;
    let position = cur.next_vec3()?;
    let normal = cur.next_vec3()?;
    let color = cur.next_vec3()?;
    let node1 = next_index(cur)?;
    let weight1 = cur.next_float()?;
    let uvs = read_uv_list(cur)?;
    Ok(Vertex {
        position,
        normal,
        color: Some(color),
        influences: influences_from_pair(node0, node1, weight1),
        uvs,
    })
}

pub(crate) fn write_vertex_multi_uv(w: &mut dyn ScalarWrite, v: &Vertex) {
    let (node1, weight1) = pair_from_influences(v);
    w.put_int(primary_node(v) as i64);
    w.put_vec3(v.position);
    w.put_vec3(v.normal);
    w.put_vec3(v.color.unwrap_or(Vec3::ZERO));
    w.put_int(node1 as i64);
    w.put_float(weight1);
    write_uv_list(w, v);
}

/// L5 (8205+): position-first with explicit weighted influence and UV lists.
/// The two fixed index+weight fields of older revisions collapse into the
/// variable-length list here.
pub(crate) fn read_vertex_weighted(cur: &mut dyn ScalarRead) -> Result<Vertex, Error> {
    let position = cur.next_vec3()?;
    let normal = cur.next_vec3()?;
    let color = cur.next_vec3()?;
    let influence_count = read_count(cur, "vertex influences")?;
    let mut influences = Influences::new();
    for _ in 0..influence_count {
        let node = next_index(cur)?;
        let weight = cur.next_float()?;
        influences.push(NodeInfluence { node, weight });
    }
    let uvs = read_uv_list(cur)?;
    Ok(Vertex {
        position,
        normal,
        color: Some(color),
        influences,
        uvs,
    })
}

pub(crate) fn write_vertex_weighted(w: &mut dyn ScalarWrite, v: &Vertex) {
    w.put_vec3(v.position);
    w.put_vec3(v.normal);
    w.put_vec3(v.color.unwrap_or(Vec3::ZERO));
    w.put_int(v.influences.len() as i64);
    for inf in &v.influences {
        w.put_int(inf.node as i64);
        w.put_float(inf.weight);
    }
    write_uv_list(w, v);
}

fn read_uv_list(cur: &mut dyn ScalarRead) -> Result<Vec<[f32; 2]>, Error> {
    let count = read_count(cur, "vertex UVs")?;
    let mut uvs = Vec::with_capacity(count);
    for _ in 0..count {
        let u = cur.next_float()?;
        let v = cur.next_float()?;
        uvs.push([u, v]);
    }
    Ok(uvs)
}

fn write_uv_list(w: &mut dyn ScalarWrite, v: &Vertex) {
    w.put_int(v.uvs.len() as i64);
    for uv in &v.uvs {
        w.put_float(uv[0]);
        w.put_float(uv[1]);
    }
}

// ============================================================================
// Triangles
// ============================================================================

/// G1 (8197–8204): region, material, three vertex indices.
pub(crate) fn read_triangle_regioned(cur: &mut dyn ScalarRead) -> Result<Triangle, Error> {
    Ok(Triangle {
        region: next_index(cur)?,
        material: next_index(cur)?,
        v0: cur.next_int()? as u32,
        v1: cur.next_int()? as u32,
        v2: cur.next_int()? as u32,
    })
}

pub(crate) fn write_triangle_regioned(w: &mut dyn ScalarWrite, t: &Triangle) {
    w.put_int(t.region as i64);
    w.put_int(t.material as i64);
    w.put_int(t.v0 as i64);
    w.put_int(t.v1 as i64);
    w.put_int(t.v2 as i64);
}

/// G2 (8205+): the region field is gone.
pub(crate) fn read_triangle_flat(cur: &mut dyn ScalarRead) -> Result<Triangle, Error> {
    Ok(Triangle {
        region: NO_INDEX,
        material: next_index(cur)?,
        v0: cur.next_int()? as u32,
        v1: cur.next_int()? as u32,
        v2: cur.next_int()? as u32,
    })
}

pub(crate) fn write_triangle_flat(w: &mut dyn ScalarWrite, t: &Triangle) {
    w.put_int(t.material as i64);
    w.put_int(t.v0 as i64);
    w.put_int(t.v1 as i64);
    w.put_int(t.v2 as i64);
}

// ============================================================================
// External references
// ============================================================================

/// X1 (8201–8204): path only.
pub(crate) fn read_xref_path(cur: &mut dyn ScalarRead) -> Result<XrefInstance, Error> {
    Ok(XrefInstance {
        path: cur.next_str()?,
        name: None,
    })
}

pub(crate) fn write_xref_path(w: &mut dyn ScalarWrite, x: &XrefInstance) {
    w.put_str(&x.path);
}

/// X2 (8205+): path plus friendly name.
pub(crate) fn read_xref_named(cur: &mut dyn ScalarRead) -> Result<XrefInstance, Error> {
    Ok(XrefInstance {
        path: cur.next_str()?,
        name: Some(cur.next_str()?),
    })
}

pub(crate) fn write_xref_named(w: &mut dyn ScalarWrite, x: &XrefInstance) {
    w.put_str(&x.path);
    w.put_str(x.name.as_deref().unwrap_or("<none>"));
}

pub(crate) fn read_xref_marker(cur: &mut dyn ScalarRead) -> Result<XrefMarker, Error> {
    Ok(XrefMarker {
        name: cur.next_str()?,
        instance: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
    })
}

pub(crate) fn write_xref_marker(w: &mut dyn ScalarWrite, x: &XrefMarker) {
    w.put_str(&x.name);
    w.put_int(x.instance as i64);
    w.put_quat(x.rotation);
    w.put_vec3(x.translation);
}

// ============================================================================
// Physics primitives and lights
// ============================================================================

struct ShapePrefix {
    name: String,
    parent: i32,
    material: i32,
    rotation: glam::Quat,
    translation: Vec3,
}

fn read_shape_prefix(cur: &mut dyn ScalarRead) -> Result<ShapePrefix, Error> {
    Ok(ShapePrefix {
        name: cur.next_str()?,
        parent: next_index(cur)?,
        material: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
    })
}

fn write_shape_prefix(
    w: &mut dyn ScalarWrite,
    name: &str,
    parent: i32,
    material: i32,
    rotation: glam::Quat,
    translation: Vec3,
) {
    w.put_str(name);
    w.put_int(parent as i64);
    w.put_int(material as i64);
    w.put_quat(rotation);
    w.put_vec3(translation);
}

pub(crate) fn read_sphere(cur: &mut dyn ScalarRead) -> Result<Sphere, Error> {
    let p = read_shape_prefix(cur)?;
    Ok(Sphere {
        name: p.name,
        parent: p.parent,
        material: p.material,
        rotation: p.rotation,
        translation: p.translation,
        radius: cur.next_float()?,
    })
}

pub(crate) fn write_sphere(w: &mut dyn ScalarWrite, s: &Sphere) {
    write_shape_prefix(w, &s.name, s.parent, s.material, s.rotation, s.translation);
    w.put_float(s.radius);
}

pub(crate) fn read_box(cur: &mut dyn ScalarRead) -> Result<BoxShape, Error> {
    let p = read_shape_prefix(cur)?;
    Ok(BoxShape {
        name: p.name,
        parent: p.parent,
        material: p.material,
        rotation: p.rotation,
        translation: p.translation,
        width: cur.next_float()?,
        length: cur.next_float()?,
        height: cur.next_float()?,
    })
}

pub(crate) fn write_box(w: &mut dyn ScalarWrite, b: &BoxShape) {
    write_shape_prefix(w, &b.name, b.parent, b.material, b.rotation, b.translation);
    w.put_float(b.width);
    w.put_float(b.length);
    w.put_float(b.height);
}

pub(crate) fn read_capsule(cur: &mut dyn ScalarRead) -> Result<Capsule, Error> {
    let p = read_shape_prefix(cur)?;
    Ok(Capsule {
        name: p.name,
        parent: p.parent,
        material: p.material,
        rotation: p.rotation,
        translation: p.translation,
        height: cur.next_float()?,
        radius: cur.next_float()?,
    })
}

pub(crate) fn write_capsule(w: &mut dyn ScalarWrite, c: &Capsule) {
    write_shape_prefix(w, &c.name, c.parent, c.material, c.rotation, c.translation);
    w.put_float(c.height);
    w.put_float(c.radius);
}

pub(crate) fn read_convex_shape(cur: &mut dyn ScalarRead) -> Result<ConvexShape, Error> {
    let p = read_shape_prefix(cur)?;
    let count = read_count(cur, "convex shape vertices")?;
    let mut vertices = Vec::with_capacity(count);
    for _ in 0..count {
        vertices.push(cur.next_vec3()?);
    }
    Ok(ConvexShape {
        name: p.name,
        parent: p.parent,
        material: p.material,
        rotation: p.rotation,
        translation: p.translation,
        vertices,
    })
}

pub(crate) fn write_convex_shape(w: &mut dyn ScalarWrite, c: &ConvexShape) {
    write_shape_prefix(w, &c.name, c.parent, c.material, c.rotation, c.translation);
    w.put_int(c.vertices.len() as i64);
    for v in &c.vertices {
        w.put_vec3(*v);
    }
}

pub(crate) fn read_ragdoll(cur: &mut dyn ScalarRead) -> Result<Ragdoll, Error> {
    Ok(Ragdoll {
        name: cur.next_str()?,
        attached: next_index(cur)?,
        referenced: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        min_twist: cur.next_float()?,
        max_twist: cur.next_float()?,
        min_cone: cur.next_float()?,
        max_cone: cur.next_float()?,
        min_plane: cur.next_float()?,
        max_plane: cur.next_float()?,
    })
}

pub(crate) fn write_ragdoll(w: &mut dyn ScalarWrite, r: &Ragdoll) {
    w.put_str(&r.name);
    w.put_int(r.attached as i64);
    w.put_int(r.referenced as i64);
    w.put_quat(r.rotation);
    w.put_vec3(r.translation);
    w.put_floats(&[
        r.min_twist,
        r.max_twist,
        r.min_cone,
        r.max_cone,
        r.min_plane,
        r.max_plane,
    ]);
}

pub(crate) fn read_hinge(cur: &mut dyn ScalarRead) -> Result<Hinge, Error> {
    Ok(Hinge {
        name: cur.next_str()?,
        body_a: next_index(cur)?,
        body_b: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        min_angle: cur.next_float()?,
        max_angle: cur.next_float()?,
        friction: cur.next_float()?,
    })
}

pub(crate) fn write_hinge(w: &mut dyn ScalarWrite, h: &Hinge) {
    w.put_str(&h.name);
    w.put_int(h.body_a as i64);
    w.put_int(h.body_b as i64);
    w.put_quat(h.rotation);
    w.put_vec3(h.translation);
    w.put_floats(&[h.min_angle, h.max_angle, h.friction]);
}

pub(crate) fn read_car_wheel(cur: &mut dyn ScalarRead) -> Result<CarWheel, Error> {
    Ok(CarWheel {
        name: cur.next_str()?,
        chassis: next_index(cur)?,
        wheel: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        suspension_min: cur.next_float()?,
        suspension_max: cur.next_float()?,
        friction: cur.next_float()?,
    })
}

pub(crate) fn write_car_wheel(w: &mut dyn ScalarWrite, c: &CarWheel) {
    w.put_str(&c.name);
    w.put_int(c.chassis as i64);
    w.put_int(c.wheel as i64);
    w.put_quat(c.rotation);
    w.put_vec3(c.translation);
    w.put_floats(&[c.suspension_min, c.suspension_max, c.friction]);
}

pub(crate) fn read_point_to_point(cur: &mut dyn ScalarRead) -> Result<PointToPoint, Error> {
    Ok(PointToPoint {
        name: cur.next_str()?,
        body_a: next_index(cur)?,
        body_b: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        min_twist: cur.next_float()?,
        max_twist: cur.next_float()?,
    })
}

pub(crate) fn write_point_to_point(w: &mut dyn ScalarWrite, p: &PointToPoint) {
    w.put_str(&p.name);
    w.put_int(p.body_a as i64);
    w.put_int(p.body_b as i64);
    w.put_quat(p.rotation);
    w.put_vec3(p.translation);
    w.put_floats(&[p.min_twist, p.max_twist]);
}

pub(crate) fn read_prismatic(cur: &mut dyn ScalarRead) -> Result<Prismatic, Error> {
    Ok(Prismatic {
        name: cur.next_str()?,
        body_a: next_index(cur)?,
        body_b: next_index(cur)?,
        rotation: cur.next_quat()?,
        translation: cur.next_vec3()?,
        min_limit: cur.next_float()?,
        max_limit: cur.next_float()?,
        friction: cur.next_float()?,
    })
}

pub(crate) fn write_prismatic(w: &mut dyn ScalarWrite, p: &Prismatic) {
    w.put_str(&p.name);
    w.put_int(p.body_a as i64);
    w.put_int(p.body_b as i64);
    w.put_quat(p.rotation);
    w.put_vec3(p.translation);
    w.put_floats(&[p.min_limit, p.max_limit, p.friction]);
}

pub(crate) fn read_bounding_sphere(cur: &mut dyn ScalarRead) -> Result<BoundingSphere, Error> {
    Ok(BoundingSphere {
        translation: cur.next_vec3()?,
        radius: cur.next_float()?,
    })
}

pub(crate) fn write_bounding_sphere(w: &mut dyn ScalarWrite, b: &BoundingSphere) {
    w.put_vec3(b.translation);
    w.put_float(b.radius);
}

pub(crate) fn read_skylight(cur: &mut dyn ScalarRead) -> Result<Skylight, Error> {
    Ok(Skylight {
        direction: cur.next_vec3()?,
        color: cur.next_vec3()?,
        power: cur.next_float()?,
    })
}

pub(crate) fn write_skylight(w: &mut dyn ScalarWrite, s: &Skylight) {
    w.put_vec3(s.direction);
    w.put_vec3(s.color);
    w.put_float(s.power);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{BinaryCursor, BinaryWriter, TextCursor, TextWriter};

    #[test]
    fn test_dispatch_table_covers_ladder() {
        for v in VERSION_MIN..=VERSION_MAX {
            let codec = codec_for(v).expect("missing codec");
            assert_eq!(codec.version(), v);
        }
        assert!(codec_for(9999).is_none());
        assert!(codec_for(8196).is_none());
    }

    #[test]
    fn test_node_encoding_switch() {
        assert_eq!(
            codec_for(8204).unwrap().node_encoding(),
            NodeGraphEncoding::ChildSiblingBased
        );
        assert_eq!(
            codec_for(8205).unwrap().node_encoding(),
            NodeGraphEncoding::ParentBased
        );
    }

    #[test]
    fn test_default_precision_threshold() {
        assert_eq!(default_precision(8204), 6);
        assert_eq!(default_precision(8205), 10);
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut cur = TextCursor::new("-1");
        assert!(matches!(
            read_count(&mut cur, "nodes"),
            Err(Error::BadCount { count: -1, .. })
        ));
    }

    #[test]
    fn test_count_beyond_remaining_rejected() {
        let mut cur = TextCursor::new("5 a b");
        assert!(matches!(
            read_count(&mut cur, "nodes"),
            Err(Error::BadCount { count: 5, .. })
        ));
    }

    #[test]
    fn test_paired_influence_roundtrip() {
        let vertex = Vertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Z,
            color: None,
            influences: smallvec![
                NodeInfluence {
                    node: 0,
                    weight: 0.75
                },
                NodeInfluence {
                    node: 2,
                    weight: 0.25
                },
            ],
            uvs: vec![[0.5, 0.5]],
        };

        let mut w = BinaryWriter::new();
        write_vertex_paired_influence(&mut w, &vertex);
        let bytes = w.finish();
        let mut cur = BinaryCursor::new(&bytes);
        let back = read_vertex_paired_influence(&mut cur).unwrap();
        assert_eq!(back, vertex);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_single_influence_pair_collapses() {
        let vertex = Vertex {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            color: None,
            influences: smallvec![NodeInfluence {
                node: 3,
                weight: 1.0
            }],
            uvs: vec![[0.0, 1.0]],
        };

        let mut w = TextWriter::new(6, false, false);
        write_vertex_paired_influence(&mut w, &vertex);
        let text = String::from_utf8(w.finish()).unwrap();
        let mut cur = TextCursor::new(&text);
        let back = read_vertex_paired_influence(&mut cur).unwrap();
        assert_eq!(back.influences.len(), 1);
        assert_eq!(back.influences[0].node, 3);
        assert_eq!(back.influences[0].weight, 1.0);
    }

    #[test]
    fn test_weighted_vertex_roundtrip() {
        let vertex = Vertex {
            position: Vec3::new(-1.0, 0.5, 4.0),
            normal: Vec3::X,
            color: Some(Vec3::new(0.25, 0.5, 1.0)),
            influences: smallvec![
                NodeInfluence {
                    node: 1,
                    weight: 0.5
                },
                NodeInfluence {
                    node: 4,
                    weight: 0.3
                },
                NodeInfluence {
                    node: 7,
                    weight: 0.2
                },
            ],
            uvs: vec![[0.0, 0.0], [1.0, 1.0]],
        };

        let mut w = BinaryWriter::new();
        write_vertex_weighted(&mut w, &vertex);
        let bytes = w.finish();
        let mut cur = BinaryCursor::new(&bytes);
        assert_eq!(read_vertex_weighted(&mut cur).unwrap(), vertex);
    }

    #[test]
    fn test_convex_shape_roundtrip() {
        let shape = ConvexShape {
            name: "hull".to_string(),
            parent: 0,
            material: NO_INDEX,
            rotation: glam::Quat::IDENTITY,
            translation: Vec3::ZERO,
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        };
        let mut w = BinaryWriter::new();
        write_convex_shape(&mut w, &shape);
        let bytes = w.finish();
        let mut cur = BinaryCursor::new(&bytes);
        assert_eq!(read_convex_shape(&mut cur).unwrap(), shape);
    }
}
