//! Revisions 8201 through 8210.
//!
//! The enhanced era starts by adding external references (8201) and ends with
//! the first constraint records (8210). The big restructure is 8205: nodes
//! switch to parent links, vertices to weighted influence lists, triangles
//! drop the region field and text precision goes to 10 digits.

use crate::cursor::{ScalarRead, ScalarWrite};
use crate::error::Error;
use crate::model::codec::*;
use crate::model::graph::NodeGraphEncoding;
use crate::model::ModelAsset;

use super::{read_checksum, read_nodes, section, write_checksum, write_nodes};

/// External reference instances and markers appear between markers and
/// regions.
pub(crate) struct V8201;

impl VersionCodec for V8201 {
    fn version(&self) -> u32 {
        8201
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_textured)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_path)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_paired_influence)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_regioned)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_child_sibling);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_textured);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_radius);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_path);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_paired_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Materials gain permutation and region names.
pub(crate) struct V8202;

impl VersionCodec for V8202 {
    fn version(&self) -> u32 {
        8202
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_grouped)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_path)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_paired_influence)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_regioned)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_child_sibling);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_grouped);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_radius);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_path);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_paired_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Vertices gain a color.
pub(crate) struct V8203;

impl VersionCodec for V8203 {
    fn version(&self) -> u32 {
        8203
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_grouped)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_path)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_colored)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_regioned)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_child_sibling);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_grouped);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_radius);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_path);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_colored);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Vertices switch to a count-prefixed UV list.
pub(crate) struct V8204;

impl VersionCodec for V8204 {
    fn version(&self) -> u32 {
        8204
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_grouped)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_path)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_multi_uv)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_regioned)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_child_sibling);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_grouped);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_radius);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_path);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_multi_uv);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// The restructure revision: parent-based nodes, weighted influence lists,
/// regionless triangles, named xrefs.
pub(crate) struct V8205;

impl VersionCodec for V8205 {
    fn version(&self) -> u32 {
        8205
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_grouped)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_grouped);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_radius);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        Ok(())
    }
}

/// Markers switch from region-relative to parent-relative.
pub(crate) struct V8206;

impl VersionCodec for V8206 {
    fn version(&self) -> u32 {
        8206
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_grouped)?;
        asset.markers = read_counted(cur, "markers", read_marker_parented)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_grouped);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_parented);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        Ok(())
    }
}

/// Materials gain an LOD slot.
pub(crate) struct V8207;

impl VersionCodec for V8207 {
    fn version(&self) -> u32 {
        8207
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_lod)?;
        asset.markers = read_counted(cur, "markers", read_marker_parented)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_lod);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_parented);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        Ok(())
    }
}

/// First physics sections: spheres and boxes after the triangles.
pub(crate) struct V8208;

impl VersionCodec for V8208 {
    fn version(&self) -> u32 {
        8208
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_lod)?;
        asset.markers = read_counted(cur, "markers", read_marker_parented)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        asset.spheres = read_counted(cur, "spheres", read_sphere)?;
        asset.boxes = read_counted(cur, "boxes", read_box)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_lod);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_parented);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        section(w, "SPHERES");
        write_counted(w, &asset.spheres, write_sphere);
        section(w, "BOXES");
        write_counted(w, &asset.boxes, write_box);
        Ok(())
    }
}

/// Capsules and convex shapes.
pub(crate) struct V8209;

impl VersionCodec for V8209 {
    fn version(&self) -> u32 {
        8209
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_lod)?;
        asset.markers = read_counted(cur, "markers", read_marker_parented)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        asset.spheres = read_counted(cur, "spheres", read_sphere)?;
        asset.boxes = read_counted(cur, "boxes", read_box)?;
        asset.capsules = read_counted(cur, "capsules", read_capsule)?;
        asset.convex_shapes = read_counted(cur, "convex shapes", read_convex_shape)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_lod);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_parented);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        section(w, "SPHERES");
        write_counted(w, &asset.spheres, write_sphere);
        section(w, "BOXES");
        write_counted(w, &asset.boxes, write_box);
        section(w, "CAPSULES");
        write_counted(w, &asset.capsules, write_capsule);
        section(w, "CONVEX SHAPES");
        write_counted(w, &asset.convex_shapes, write_convex_shape);
        Ok(())
    }
}

/// Ragdoll and hinge constraints.
pub(crate) struct V8210;

impl VersionCodec for V8210 {
    fn version(&self) -> u32 {
        8210
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ParentBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_parented)?;
        asset.materials = read_counted(cur, "materials", read_material_lod)?;
        asset.markers = read_counted(cur, "markers", read_marker_parented)?;
        asset.xref_instances = read_counted(cur, "xref instances", read_xref_named)?;
        asset.xref_markers = read_counted(cur, "xref markers", read_xref_marker)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_weighted)?;
        asset.triangles = read_counted(cur, "triangles", read_triangle_flat)?;
        asset.spheres = read_counted(cur, "spheres", read_sphere)?;
        asset.boxes = read_counted(cur, "boxes", read_box)?;
        asset.capsules = read_counted(cur, "capsules", read_capsule)?;
        asset.convex_shapes = read_counted(cur, "convex shapes", read_convex_shape)?;
        asset.ragdolls = read_counted(cur, "ragdolls", read_ragdoll)?;
        asset.hinges = read_counted(cur, "hinges", read_hinge)?;
        Ok(())
    }

    fn encode(
        &self,
        w: &mut dyn ScalarWrite,
        asset: &ModelAsset,
        opts: &WriteOptions,
    ) -> Result<(), Error> {
        write_checksum(w, asset, opts);
        section(w, "NODES");
        write_nodes(w, asset, write_node_parented);
        section(w, "MATERIALS");
        write_counted(w, &asset.materials, write_material_lod);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_parented);
        section(w, "XREF PATHS");
        write_counted(w, &asset.xref_instances, write_xref_named);
        section(w, "XREF MARKERS");
        write_counted(w, &asset.xref_markers, write_xref_marker);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_weighted);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_flat);
        section(w, "SPHERES");
        write_counted(w, &asset.spheres, write_sphere);
        section(w, "BOXES");
        write_counted(w, &asset.boxes, write_box);
        section(w, "CAPSULES");
        write_counted(w, &asset.capsules, write_capsule);
        section(w, "CONVEX SHAPES");
        write_counted(w, &asset.convex_shapes, write_convex_shape);
        section(w, "RAGDOLLS");
        write_counted(w, &asset.ragdolls, write_ragdoll);
        section(w, "HINGES");
        write_counted(w, &asset.hinges, write_hinge);
        Ok(())
    }
}
