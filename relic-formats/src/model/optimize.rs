//! Duplicate-vertex welding.
//!
//! Exporters frequently emit one vertex per face corner, so identical
//! vertices show up dozens of times. `optimize` collapses exact duplicates
//! and remaps the triangle list; it never moves, averages or reorders
//! surviving vertices, so winding and appearance are untouched.

use hashbrown::HashMap;
use tracing::debug;

use crate::model::types::{Triangle, Vertex};

/// Bucket key: the exact bit patterns of the position components. Distinct
/// representations of equal values (0.0 vs -0.0) land in different buckets on
/// purpose; only byte-identical positions can be duplicates.
fn position_key(v: &Vertex) -> [u32; 3] {
    [
        v.position.x.to_bits(),
        v.position.y.to_bits(),
        v.position.z.to_bits(),
    ]
}

/// Two vertices are duplicates only on exact equality of every attribute,
/// with influence and UV lists compared in order. Positions are compared by
/// bit pattern, matching the bucket key, so 0.0 and -0.0 stay distinct.
fn same_vertex(a: &Vertex, b: &Vertex) -> bool {
    position_key(a) == position_key(b)
        && a.normal == b.normal
        && a.color == b.color
        && a.influences == b.influences
        && a.uvs == b.uvs
}

/// Weld duplicate vertices and remap `triangles` accordingly.
///
/// Pure: inputs are untouched, output is a fresh pair. Each duplicate is
/// aliased to the lowest-indexed surviving copy, then the vertex array is
/// compacted. Idempotent, and the output vertex count never exceeds the
/// input count.
///
/// Triangle vertex indices must be in range of `vertices`; parsed containers
/// satisfy this because [`parse_model`](crate::model::parse_model) validates
/// every index field.
pub fn optimize(vertices: &[Vertex], triangles: &[Triangle]) -> (Vec<Vertex>, Vec<Triangle>) {
    // Alias every vertex to the first identical one.
    let mut buckets: HashMap<[u32; 3], Vec<usize>> = HashMap::new();
    let mut alias: Vec<usize> = Vec::with_capacity(vertices.len());
    for (i, vertex) in vertices.iter().enumerate() {
        let bucket = buckets.entry(position_key(vertex)).or_default();
        let target = bucket
            .iter()
            .copied()
            .find(|&j| same_vertex(&vertices[j], vertex));
        match target {
            Some(j) => alias.push(j),
            None => {
                bucket.push(i);
                alias.push(i);
            }
        }
    }

    // Compact the survivors, keeping their relative order.
    let mut compacted: Vec<usize> = vec![usize::MAX; vertices.len()];
    let mut out_vertices = Vec::new();
    for (i, vertex) in vertices.iter().enumerate() {
        if alias[i] == i {
            compacted[i] = out_vertices.len();
            out_vertices.push(vertex.clone());
        }
    }

    let out_triangles = triangles
        .iter()
        .map(|t| Triangle {
            v0: compacted[alias[t.v0 as usize]] as u32,
            v1: compacted[alias[t.v1 as usize]] as u32,
            v2: compacted[alias[t.v2 as usize]] as u32,
            ..*t
        })
        .collect();

    debug!(
        before = vertices.len(),
        after = out_vertices.len(),
        "welded duplicate vertices"
    );
    (out_vertices, out_triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{NodeInfluence, NO_INDEX};
    use glam::Vec3;
    use smallvec::smallvec;

    fn vertex(x: f32, node: i32) -> Vertex {
        Vertex {
            position: Vec3::new(x, 0.0, 0.0),
            normal: Vec3::Z,
            color: None,
            influences: smallvec![NodeInfluence { node, weight: 1.0 }],
            uvs: vec![[0.0, 0.0]],
        }
    }

    fn tri(v0: u32, v1: u32, v2: u32) -> Triangle {
        Triangle {
            region: NO_INDEX,
            material: 0,
            v0,
            v1,
            v2,
        }
    }

    #[test]
    fn test_welds_exact_duplicates() {
        let vertices = vec![vertex(0.0, 0), vertex(1.0, 0), vertex(0.0, 0)];
        let triangles = vec![tri(0, 1, 2)];
        let (v, t) = optimize(&vertices, &triangles);
        assert_eq!(v.len(), 2);
        assert_eq!(t[0].indices(), [0, 1, 0]);
    }

    #[test]
    fn test_attribute_mismatch_is_not_a_duplicate() {
        // Same position, different influence node.
        let vertices = vec![vertex(0.0, 0), vertex(0.0, 1)];
        let (v, _) = optimize(&vertices, &[]);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_aliases_to_lowest_index() {
        let vertices = vec![
            vertex(5.0, 0),
            vertex(0.0, 0),
            vertex(5.0, 0),
            vertex(5.0, 0),
        ];
        let triangles = vec![tri(3, 1, 2)];
        let (v, t) = optimize(&vertices, &triangles);
        // Survivors are the first copies, in input order.
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].position.x, 5.0);
        assert_eq!(v[1].position.x, 0.0);
        assert_eq!(t[0].indices(), [0, 1, 0]);
    }

    #[test]
    fn test_winding_preserved() {
        let vertices = vec![vertex(0.0, 0), vertex(1.0, 0), vertex(2.0, 0)];
        let triangles = vec![tri(0, 1, 2), tri(2, 1, 0)];
        let (_, t) = optimize(&vertices, &triangles);
        assert_eq!(t[0].indices(), [0, 1, 2]);
        assert_eq!(t[1].indices(), [2, 1, 0]);
    }

    #[test]
    fn test_idempotent() {
        let vertices = vec![vertex(0.0, 0), vertex(0.0, 0), vertex(1.0, 0)];
        let triangles = vec![tri(0, 1, 2)];
        let (v1, t1) = optimize(&vertices, &triangles);
        let (v2, t2) = optimize(&v1, &t1);
        assert_eq!(v1, v2);
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_negative_zero_is_distinct() {
        let mut a = vertex(0.0, 0);
        a.position.x = -0.0;
        let b = vertex(0.0, 0);
        let (v, _) = optimize(&[a, b], &[]);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let (v, t) = optimize(&[], &[]);
        assert!(v.is_empty());
        assert!(t.is_empty());
    }
}
