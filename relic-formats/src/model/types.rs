//! Entity types stored in a [`ModelAsset`](super::ModelAsset).
//!
//! Index fields use `i32` with `-1` meaning "absent"; any other value must be
//! a valid index into the target collection. Which fields a given file
//! actually carries depends on its format version; see the layout ladder in
//! `codec.rs`. Fields outside a version's set keep their defaults after a
//! parse and are dropped (not corrupted) on export.

use glam::{Quat, Vec3};
use smallvec::SmallVec;

/// Sentinel for absent index fields.
pub const NO_INDEX: i32 = -1;

/// Skeleton node. Exactly one link representation is authoritative per
/// format version (parent-based from 8205, child/sibling before); the other
/// is derived by hierarchy reconstruction after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNode {
    pub name: String,
    pub parent: i32,
    pub child: i32,
    pub sibling: i32,
}

impl ModelNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: NO_INDEX,
            child: NO_INDEX,
            sibling: NO_INDEX,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent == NO_INDEX
    }
}

/// Bind-pose transform, index-aligned with the node list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Material reference. Optional fields exist only at certain versions:
/// `texture_path` from 8198, `permutation`/`region` from 8202, `lod` from
/// 8207.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Material {
    pub name: String,
    pub texture_path: Option<String>,
    pub lod: Option<i32>,
    pub permutation: Option<String>,
    pub region: Option<String>,
}

/// Named attachment point. `region` is authoritative before 8206, `parent`
/// from 8206 on; `radius` exists from 8200.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub region: i32,
    pub parent: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub radius: f32,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: NO_INDEX,
            parent: NO_INDEX,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

/// Named geometry grouping used for selective rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
}

/// How much one skeletal node deforms a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInfluence {
    pub node: i32,
    pub weight: f32,
}

/// Influence list; the format never stores more than 4 per vertex.
pub type Influences = SmallVec<[NodeInfluence; 4]>;

/// Skinned vertex. Influence and UV cardinality are version-dependent:
/// 1 influence (8197), 2 (8199), variable (8205); 1 UV pair before 8204,
/// variable after. `color` exists from 8203.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Option<Vec3>,
    pub influences: Influences,
    pub uvs: Vec<[f32; 2]>,
}

/// Triangle; `region` is dropped from the wire format at 8205.
/// `material == -1` means "no material".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub region: i32,
    pub material: i32,
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl Triangle {
    pub fn indices(&self) -> [u32; 3] {
        [self.v0, self.v1, self.v2]
    }
}

// ============================================================================
// Physics primitives (8208+) and lights (8213)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub name: String,
    pub parent: i32,
    pub material: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    pub name: String,
    pub parent: i32,
    pub material: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub width: f32,
    pub length: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    pub name: String,
    pub parent: i32,
    pub material: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub height: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvexShape {
    pub name: String,
    pub parent: i32,
    pub material: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub vertices: Vec<Vec3>,
}

/// Ragdoll constraint between two rigid bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Ragdoll {
    pub name: String,
    pub attached: i32,
    pub referenced: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub min_twist: f32,
    pub max_twist: f32,
    pub min_cone: f32,
    pub max_cone: f32,
    pub min_plane: f32,
    pub max_plane: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hinge {
    pub name: String,
    pub body_a: i32,
    pub body_b: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub min_angle: f32,
    pub max_angle: f32,
    pub friction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarWheel {
    pub name: String,
    pub chassis: i32,
    pub wheel: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub suspension_min: f32,
    pub suspension_max: f32,
    pub friction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointToPoint {
    pub name: String,
    pub body_a: i32,
    pub body_b: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub min_twist: f32,
    pub max_twist: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prismatic {
    pub name: String,
    pub body_a: i32,
    pub body_b: i32,
    pub rotation: Quat,
    pub translation: Vec3,
    pub min_limit: f32,
    pub max_limit: f32,
    pub friction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub translation: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skylight {
    pub direction: Vec3,
    pub color: Vec3,
    pub power: f32,
}

// ============================================================================
// External references (8201+)
// ============================================================================

/// Placeholder for another asset file, resolved at load time by the host.
/// `name` (a friendly display name) exists from 8205.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefInstance {
    pub path: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XrefMarker {
    pub name: String,
    /// Index into `xref_instances`.
    pub instance: i32,
    pub rotation: Quat,
    pub translation: Vec3,
}
