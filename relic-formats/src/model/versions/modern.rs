//! Revisions 8211 through 8213.
//!
//! The modern era keeps the 8205 core layout and appends vehicle constraints
//! (8211), bounding spheres (8212) and skylights (8213).

use crate::cursor::{ScalarRead, ScalarWrite};
use crate::error::Error;
use crate::model::codec::*;
use crate::model::graph::NodeGraphEncoding;
use crate::model::ModelAsset;

use super::{read_checksum, read_nodes, section, write_checksum, write_nodes};

/// Car wheels, point-to-point and prismatic constraints.
pub(crate) struct V8211;

impl VersionCodec for V8211 {
    fn version(&self) -> u32 {
        8211
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
        asset.car_wheels = read_counted(cur, "car wheels", read_car_wheel)?;
        asset.point_to_points = read_counted(cur, "point to points", read_point_to_point)?;
        asset.prismatics = read_counted(cur, "prismatics", read_prismatic)?;
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
        section(w, "CAR WHEELS");
        write_counted(w, &asset.car_wheels, write_car_wheel);
        section(w, "POINT TO POINTS");
        write_counted(w, &asset.point_to_points, write_point_to_point);
        section(w, "PRISMATICS");
        write_counted(w, &asset.prismatics, write_prismatic);
        Ok(())
    }
}

/// Bounding spheres.
pub(crate) struct V8212;

impl VersionCodec for V8212 {
    fn version(&self) -> u32 {
        8212
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
        asset.car_wheels = read_counted(cur, "car wheels", read_car_wheel)?;
        asset.point_to_points = read_counted(cur, "point to points", read_point_to_point)?;
        asset.prismatics = read_counted(cur, "prismatics", read_prismatic)?;
        asset.bounding_spheres = read_counted(cur, "bounding spheres", read_bounding_sphere)?;
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
        section(w, "CAR WHEELS");
        write_counted(w, &asset.car_wheels, write_car_wheel);
        section(w, "POINT TO POINTS");
        write_counted(w, &asset.point_to_points, write_point_to_point);
        section(w, "PRISMATICS");
        write_counted(w, &asset.prismatics, write_prismatic);
        section(w, "BOUNDING SPHERES");
        write_counted(w, &asset.bounding_spheres, write_bounding_sphere);
        Ok(())
    }
}

/// Skylights.
pub(crate) struct V8213;

impl VersionCodec for V8213 {
    fn version(&self) -> u32 {
        8213
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
        asset.car_wheels = read_counted(cur, "car wheels", read_car_wheel)?;
        asset.point_to_points = read_counted(cur, "point to points", read_point_to_point)?;
        asset.prismatics = read_counted(cur, "prismatics", read_prismatic)?;
        asset.bounding_spheres = read_counted(cur, "bounding spheres", read_bounding_sphere)?;
        asset.skylights = read_counted(cur, "skylights", read_skylight)?;
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
        section(w, "CAR WHEELS");
        write_counted(w, &asset.car_wheels, write_car_wheel);
        section(w, "POINT TO POINTS");
        write_counted(w, &asset.point_to_points, write_point_to_point);
        section(w, "PRISMATICS");
        write_counted(w, &asset.prismatics, write_prismatic);
        section(w, "BOUNDING SPHERES");
        write_counted(w, &asset.bounding_spheres, write_bounding_sphere);
        section(w, "SKYLIGHTS");
        write_counted(w, &asset.skylights, write_skylight);
        Ok(())
    }
}
