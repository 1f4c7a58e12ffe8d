//! Revisions 8197 through 8200.
//!
//! The classic era: child/sibling node links, single-UV vertices, region
//! field on every triangle, no external references and no physics sections.

use crate::cursor::{ScalarRead, ScalarWrite};
use crate::error::Error;
use crate::model::codec::*;
use crate::model::graph::NodeGraphEncoding;
use crate::model::ModelAsset;

use super::{read_checksum, read_nodes, section, write_checksum, write_nodes};

/// Base revision.
pub(crate) struct V8197;

impl VersionCodec for V8197 {
    fn version(&self) -> u32 {
        8197
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_name_only)?;
        asset.markers = read_counted(cur, "markers", read_marker_regioned)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_single_influence)?;
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
        write_counted(w, &asset.materials, write_material_name_only);
        section(w, "MARKERS");
        write_counted(w, &asset.markers, write_marker_regioned);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_single_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Materials gain a texture path.
pub(crate) struct V8198;

impl VersionCodec for V8198 {
    fn version(&self) -> u32 {
        8198
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_textured)?;
        asset.markers = read_counted(cur, "markers", read_marker_regioned)?;
        asset.regions = read_counted(cur, "regions", read_region)?;
        asset.vertices = read_counted(cur, "vertices", read_vertex_single_influence)?;
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
        write_counted(w, &asset.markers, write_marker_regioned);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_single_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Vertices gain a second influence.
pub(crate) struct V8199;

impl VersionCodec for V8199 {
    fn version(&self) -> u32 {
        8199
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_textured)?;
        asset.markers = read_counted(cur, "markers", read_marker_regioned)?;
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
        write_counted(w, &asset.markers, write_marker_regioned);
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_paired_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}

/// Markers gain a radius.
pub(crate) struct V8200;

impl VersionCodec for V8200 {
    fn version(&self) -> u32 {
        8200
    }

    fn node_encoding(&self) -> NodeGraphEncoding {
        NodeGraphEncoding::ChildSiblingBased
    }

    fn decode(&self, cur: &mut dyn ScalarRead, asset: &mut ModelAsset) -> Result<(), Error> {
        read_checksum(cur, asset)?;
        read_nodes(cur, asset, read_node_child_sibling)?;
        asset.materials = read_counted(cur, "materials", read_material_textured)?;
        asset.markers = read_counted(cur, "markers", read_marker_radius)?;
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
        section(w, "REGIONS");
        write_counted(w, &asset.regions, write_region);
        section(w, "VERTICES");
        write_counted(w, &asset.vertices, write_vertex_paired_influence);
        section(w, "TRIANGLES");
        write_counted(w, &asset.triangles, write_triangle_regioned);
        Ok(())
    }
}
