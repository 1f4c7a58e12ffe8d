//! Versioned model asset codec (JMF).
//!
//! A model file is a version integer followed by a fixed sequence of
//! count-prefixed sections; which sections exist and their exact record
//! layouts depend on the version (8197 through 8213). The same section
//! sequence has two encodings, whitespace-token text and little-endian
//! binary, distinguished by the `JMFB` magic.
//!
//! Entry points: [`parse_model`] and [`write_model`]. Parsing targets a
//! [`GameProfile`] that narrows the accepted version range; writing accepts
//! any version the crate knows.

use std::fmt;

use tracing::debug;

use crate::cursor::{BinaryCursor, BinaryWriter, ScalarRead, TextCursor, TextWriter};
use crate::cursor::ScalarWrite as _;
use crate::error::{Error, ParseWarning};

mod codec;
mod graph;
mod optimize;
mod types;
mod versions;

pub use codec::{default_precision, WriteOptions, VERSION_MAX, VERSION_MIN};
pub use graph::{node_checksum, reconstruct_hierarchy, NodeChecksumFn, NodeGraphEncoding};
pub use optimize::optimize;
pub use types::*;

/// Magic prefix of the binary encoding. Text files start with the bare
/// version integer instead.
pub const BINARY_MAGIC: &[u8; 4] = b"JMFB";

/// Which game generation is consuming the file. Newer profiles accept
/// everything the older ones do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameProfile {
    Classic,
    Enhanced,
    Modern,
}

impl GameProfile {
    /// Inclusive version range this profile accepts.
    pub fn version_range(self) -> (u32, u32) {
        match self {
            GameProfile::Classic => (VERSION_MIN, 8200),
            GameProfile::Enhanced => (VERSION_MIN, 8210),
            GameProfile::Modern => (VERSION_MIN, VERSION_MAX),
        }
    }

    pub fn supports(self, version: u32) -> bool {
        let (lo, hi) = self.version_range();
        (lo..=hi).contains(&version)
    }
}

impl fmt::Display for GameProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameProfile::Classic => "Classic",
            GameProfile::Enhanced => "Enhanced",
            GameProfile::Modern => "Modern",
        })
    }
}

/// In-memory model. Collections a version does not carry stay empty after a
/// parse and are silently dropped on export to that version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAsset {
    pub version: u32,
    /// Node hierarchy checksum as stored in the file; 0 when absent.
    pub checksum: u32,
    pub nodes: Vec<ModelNode>,
    /// Bind-pose transforms, index-aligned with `nodes`.
    pub transforms: Vec<NodeTransform>,
    pub materials: Vec<Material>,
    pub markers: Vec<Marker>,
    pub regions: Vec<Region>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub spheres: Vec<Sphere>,
    pub boxes: Vec<BoxShape>,
    pub capsules: Vec<Capsule>,
    pub convex_shapes: Vec<ConvexShape>,
    pub ragdolls: Vec<Ragdoll>,
    pub hinges: Vec<Hinge>,
    pub car_wheels: Vec<CarWheel>,
    pub point_to_points: Vec<PointToPoint>,
    pub prismatics: Vec<Prismatic>,
    pub bounding_spheres: Vec<BoundingSphere>,
    pub skylights: Vec<Skylight>,
    pub xref_instances: Vec<XrefInstance>,
    pub xref_markers: Vec<XrefMarker>,
}

/// A parsed model plus the non-fatal anomalies found along the way.
#[derive(Debug)]
pub struct ParsedModel {
    pub asset: ModelAsset,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a model file in either encoding, gated by `profile`.
///
/// The version is validated before any entity is decoded. After decoding,
/// the node hierarchy is reconstructed so both link representations are
/// populated regardless of which one the file stored, and every index field
/// is checked against its target collection. A successfully parsed container
/// never holds a dangling index.
pub fn parse_model(input: &[u8], profile: GameProfile) -> Result<ParsedModel, Error> {
    if input.starts_with(BINARY_MAGIC) {
        let mut cur = BinaryCursor::new(&input[BINARY_MAGIC.len()..]);
        parse_from(&mut cur, profile)
    } else {
        let text = String::from_utf8_lossy(input);
        let mut cur = TextCursor::new(&text);
        parse_from(&mut cur, profile)
    }
}

fn parse_from(cur: &mut dyn ScalarRead, profile: GameProfile) -> Result<ParsedModel, Error> {
    let version = cur.next_int()?;
    let (lo, hi) = profile.version_range();
    let codec = u32::try_from(version)
        .ok()
        .filter(|v| profile.supports(*v))
        .and_then(codec::codec_for)
        .ok_or(Error::UnsupportedVersion {
            version,
            profile,
            lo,
            hi,
        })?;

    let mut asset = ModelAsset {
        version: version as u32,
        ..ModelAsset::default()
    };
    codec.decode(cur, &mut asset)?;
    graph::reconstruct_hierarchy(&mut asset.nodes, codec.node_encoding())?;
    check_indices(&asset)?;

    let mut warnings = Vec::new();
    check_material_references(&asset, &mut warnings);
    if cur.remaining() > 0 {
        warnings.push(ParseWarning::TrailingData {
            remaining: cur.remaining(),
        });
    }

    debug!(
        version = asset.version,
        nodes = asset.nodes.len(),
        vertices = asset.vertices.len(),
        triangles = asset.triangles.len(),
        warnings = warnings.len(),
        "parsed model"
    );
    Ok(ParsedModel { asset, warnings })
}

/// Material region/permutation fields reference regions by name; dangling
/// names are advisory only.
fn check_material_references(asset: &ModelAsset, warnings: &mut Vec<ParseWarning>) {
    for material in &asset.materials {
        for name in [material.region.as_deref(), material.permutation.as_deref()]
            .into_iter()
            .flatten()
        {
            if !asset.regions.iter().any(|r| r.name == name) {
                warnings.push(ParseWarning::MissingReference {
                    kind: "Material",
                    name: name.to_string(),
                    collection: "regions",
                });
            }
        }
    }
}

/// Serialize `asset` at the given version.
///
/// Any version the crate knows is writable; fields the target version does
/// not carry are dropped, never mangled. Fails fast via
/// [`validate_for_export`] before emitting a single byte.
pub fn write_model(asset: &ModelAsset, version: u32, opts: &WriteOptions) -> Result<Vec<u8>, Error> {
    let codec = codec::codec_for(version).ok_or(Error::UnsupportedVersion {
        version: version as i64,
        profile: GameProfile::Modern,
        lo: VERSION_MIN,
        hi: VERSION_MAX,
    })?;
    validate_for_export(asset)?;

    debug!(version, binary = opts.binary, "writing model");
    if opts.binary {
        let mut w = BinaryWriter::new();
        w.push_raw(BINARY_MAGIC);
        w.put_int(version as i64);
        codec.encode(&mut w, asset, opts)?;
        Ok(w.finish())
    } else {
        let precision = opts.precision.unwrap_or_else(|| default_precision(version));
        let mut w = TextWriter::new(precision, opts.comments, opts.blank_lines);
        w.put_int(version as i64);
        codec.encode(&mut w, asset, opts)?;
        Ok(w.finish())
    }
}

/// Export preconditions: at least one node, aligned transforms, and the same
/// index validity enforced at parse time.
pub fn validate_for_export(asset: &ModelAsset) -> Result<(), Error> {
    if asset.nodes.is_empty() {
        return Err(Error::Precondition("nodes".to_string()));
    }
    if asset.nodes.len() != asset.transforms.len() {
        return Err(Error::Precondition(format!(
            "node transforms ({} transforms for {} nodes)",
            asset.transforms.len(),
            asset.nodes.len()
        )));
    }
    check_indices(asset)
}

/// Every index field must be -1 or in range of its target collection. Runs
/// on every parse and export, so no container with a dangling index ever
/// crosses the API boundary in either direction.
fn check_indices(asset: &ModelAsset) -> Result<(), Error> {
    let nodes = asset.nodes.len();
    for node in &asset.nodes {
        check_link(node.parent, nodes, "node parent")?;
        check_link(node.child, nodes, "node child")?;
        check_link(node.sibling, nodes, "node sibling")?;
    }
    for marker in &asset.markers {
        check_link(marker.region, asset.regions.len(), "marker region")?;
        check_link(marker.parent, nodes, "marker parent")?;
    }
    for vertex in &asset.vertices {
        for inf in &vertex.influences {
            check_link(inf.node, nodes, "vertex influence node")?;
        }
    }
    for tri in &asset.triangles {
        check_link(tri.region, asset.regions.len(), "triangle region")?;
        check_link(tri.material, asset.materials.len(), "triangle material")?;
        for v in tri.indices() {
            if v as usize >= asset.vertices.len() {
                return Err(Error::IndexOutOfRange {
                    what: "triangle vertex",
                    index: v as i64,
                    len: asset.vertices.len(),
                });
            }
        }
    }
    for xm in &asset.xref_markers {
        check_link(xm.instance, asset.xref_instances.len(), "xref marker instance")?;
    }

    let materials = asset.materials.len();
    for s in &asset.spheres {
        check_link(s.parent, nodes, "sphere parent")?;
        check_link(s.material, materials, "sphere material")?;
    }
    for b in &asset.boxes {
        check_link(b.parent, nodes, "box parent")?;
        check_link(b.material, materials, "box material")?;
    }
    for c in &asset.capsules {
        check_link(c.parent, nodes, "capsule parent")?;
        check_link(c.material, materials, "capsule material")?;
    }
    for c in &asset.convex_shapes {
        check_link(c.parent, nodes, "convex shape parent")?;
        check_link(c.material, materials, "convex shape material")?;
    }
    for r in &asset.ragdolls {
        check_link(r.attached, nodes, "ragdoll attached node")?;
        check_link(r.referenced, nodes, "ragdoll referenced node")?;
    }
    for h in &asset.hinges {
        check_link(h.body_a, nodes, "hinge body")?;
        check_link(h.body_b, nodes, "hinge body")?;
    }
    for c in &asset.car_wheels {
        check_link(c.chassis, nodes, "car wheel chassis")?;
        check_link(c.wheel, nodes, "car wheel node")?;
    }
    for p in &asset.point_to_points {
        check_link(p.body_a, nodes, "point to point body")?;
        check_link(p.body_b, nodes, "point to point body")?;
    }
    for p in &asset.prismatics {
        check_link(p.body_a, nodes, "prismatic body")?;
        check_link(p.body_b, nodes, "prismatic body")?;
    }
    Ok(())
}

fn check_link(index: i32, len: usize, what: &'static str) -> Result<(), Error> {
    if index == NO_INDEX || (index >= 0 && (index as usize) < len) {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange {
            what,
            index: index as i64,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use smallvec::smallvec;

    fn minimal_asset() -> ModelAsset {
        ModelAsset {
            version: 8197,
            nodes: vec![ModelNode::named("root")],
            transforms: vec![NodeTransform::IDENTITY],
            regions: vec![Region {
                name: "unnamed".to_string(),
            }],
            materials: vec![Material {
                name: "metal".to_string(),
                ..Material::default()
            }],
            vertices: vec![
                Vertex {
                    position: Vec3::ZERO,
                    normal: Vec3::Z,
                    influences: smallvec![NodeInfluence { node: 0, weight: 1.0 }],
                    uvs: vec![[0.0, 0.0]],
                    ..Vertex::default()
                };
                3
            ],
            triangles: vec![Triangle {
                region: 0,
                material: 0,
                v0: 0,
                v1: 1,
                v2: 2,
            }],
            ..ModelAsset::default()
        }
    }

    #[test]
    fn test_version_gate_rejects_unknown() {
        let err = parse_model(b"9999 0 0 0 0 0 0 0", GameProfile::Modern).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion { version: 9999, .. }
        ));
    }

    #[test]
    fn test_version_gate_honors_profile() {
        // 8205 is fine for Enhanced but out of range for Classic.
        let asset = {
            let mut a = minimal_asset();
            a.version = 8205;
            a
        };
        let bytes = write_model(&asset, 8205, &WriteOptions::default()).unwrap();
        assert!(parse_model(&bytes, GameProfile::Enhanced).is_ok());
        let err = parse_model(&bytes, GameProfile::Classic).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion {
                version: 8205,
                profile: GameProfile::Classic,
                lo: 8197,
                hi: 8200,
            }
        ));
    }

    #[test]
    fn test_text_and_binary_sniffing() {
        let asset = minimal_asset();
        let text = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
        assert!(text.starts_with(b"8197"));

        let opts = WriteOptions {
            binary: true,
            ..WriteOptions::default()
        };
        let binary = write_model(&asset, 8197, &opts).unwrap();
        assert!(binary.starts_with(BINARY_MAGIC));

        let from_text = parse_model(&text, GameProfile::Classic).unwrap();
        let from_binary = parse_model(&binary, GameProfile::Classic).unwrap();
        assert_eq!(from_text.asset, from_binary.asset);
    }

    #[test]
    fn test_empty_node_list_fails_precondition() {
        let mut asset = minimal_asset();
        asset.nodes.clear();
        asset.transforms.clear();
        let err = write_model(&asset, 8197, &WriteOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "no valid nodes");
    }

    #[test]
    fn test_out_of_range_index_fails_export() {
        let mut asset = minimal_asset();
        asset.triangles[0].material = 5;
        let err = write_model(&asset, 8197, &WriteOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "triangle material",
                index: 5,
                len: 1,
            }
        ));
    }

    #[test]
    fn test_bad_triangle_vertex_index_fails_parse() {
        // Three vertices but the triangle names vertex 9. Must be a parse
        // error, not a container that later panics in the optimizer.
        let text = "\
8197
0
1
root\t-1\t-1
0.0 0.0 0.0 1.0
0.0 0.0 0.0
0
0
1
unnamed
3
0\t0.0 0.0 0.0\t0.0 0.0 1.0\t0.0 0.0
0\t1.0 0.0 0.0\t0.0 0.0 1.0\t0.0 0.0
0\t0.0 1.0 0.0\t0.0 0.0 1.0\t0.0 0.0
1
0 -1 0 1 9
";
        let err = parse_model(text.as_bytes(), GameProfile::Classic).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "triangle vertex",
                index: 9,
                len: 3,
            }
        ));
    }

    #[test]
    fn test_bad_influence_node_index_fails_parse() {
        // Single node but the vertex is influenced by node 4.
        let text = "\
8197
0
1
root\t-1\t-1
0.0 0.0 0.0 1.0
0.0 0.0 0.0
0
0
1
unnamed
1
4\t0.0 0.0 0.0\t0.0 0.0 1.0\t0.0 0.0
0
";
        let err = parse_model(text.as_bytes(), GameProfile::Classic).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "vertex influence node",
                index: 4,
                len: 1,
            }
        ));
    }

    #[test]
    fn test_misaligned_transforms_fail_precondition() {
        let mut asset = minimal_asset();
        asset.transforms.push(NodeTransform::IDENTITY);
        assert!(matches!(
            write_model(&asset, 8197, &WriteOptions::default()),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn test_dangling_material_region_warns() {
        let mut asset = minimal_asset();
        asset.version = 8202;
        asset.materials[0].texture_path = Some("<none>".to_string());
        asset.materials[0].permutation = Some("unnamed".to_string());
        asset.materials[0].region = Some("missing_region".to_string());
        let bytes = write_model(&asset, 8202, &WriteOptions::default()).unwrap();
        let parsed = parse_model(&bytes, GameProfile::Enhanced).unwrap();
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::MissingReference {
                kind: "Material",
                name: "missing_region".to_string(),
                collection: "regions",
            }]
        );
    }

    #[test]
    fn test_trailing_tokens_warn_but_parse() {
        let asset = minimal_asset();
        let mut text = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
        text.extend_from_slice(b"\n7 8 9\n");
        let parsed = parse_model(&text, GameProfile::Classic).unwrap();
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::TrailingData { remaining: 3 }]
        );
        assert_eq!(parsed.asset, asset);
    }

    #[test]
    fn test_checksum_written_on_request() {
        let asset = minimal_asset();
        let plain = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
        let parsed = parse_model(&plain, GameProfile::Classic).unwrap();
        assert_eq!(parsed.asset.checksum, 0);

        let opts = WriteOptions {
            checksum: Some(node_checksum),
            ..WriteOptions::default()
        };
        let summed = write_model(&asset, 8197, &opts).unwrap();
        let parsed = parse_model(&summed, GameProfile::Classic).unwrap();
        assert_eq!(parsed.asset.checksum, node_checksum(&asset.nodes));
        assert_ne!(parsed.asset.checksum, 0);
    }

    #[test]
    fn test_verbose_text_reparses_identically() {
        let asset = minimal_asset();
        let plain = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
        let opts = WriteOptions {
            comments: true,
            blank_lines: true,
            ..WriteOptions::default()
        };
        let verbose = write_model(&asset, 8197, &opts).unwrap();
        assert_ne!(plain, verbose);
        let a = parse_model(&plain, GameProfile::Classic).unwrap();
        let b = parse_model(&verbose, GameProfile::Classic).unwrap();
        assert_eq!(a.asset, b.asset);
    }
}
