//! Whole-file round-trips across the full version ladder.

use glam::{Quat, Vec3};
use smallvec::smallvec;

use relic_formats::model::{
    parse_model, reconstruct_hierarchy, write_model, BoundingSphere, BoxShape, Capsule, CarWheel,
    ConvexShape, GameProfile, Hinge, Influences, Marker, Material, ModelAsset, ModelNode,
    NodeGraphEncoding, NodeTransform, PointToPoint, Prismatic, Ragdoll, Region, Skylight, Sphere,
    Triangle, Vertex, WriteOptions, XrefInstance, XrefMarker, NO_INDEX, VERSION_MAX, VERSION_MIN,
};

/// Build an asset that uses every feature the given version can carry and
/// nothing it cannot, so write-then-parse reproduces it exactly.
fn sample_asset_for(version: u32) -> ModelAsset {
    let mut asset = ModelAsset {
        version,
        ..ModelAsset::default()
    };

    let mut nodes = vec![
        ModelNode::named("pelvis"),
        ModelNode::named("spine"),
        ModelNode::named("thigh_l"),
    ];
    nodes[1].parent = 0;
    nodes[2].parent = 0;
    reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap();
    asset.nodes = nodes;
    asset.transforms = vec![
        NodeTransform::IDENTITY,
        NodeTransform {
            rotation: Quat::from_xyzw(0.5, 0.5, 0.5, 0.5),
            translation: Vec3::new(0.0, 0.25, 1.5),
        },
        NodeTransform {
            rotation: Quat::IDENTITY,
            translation: Vec3::new(-0.5, 0.0, 0.75),
        },
    ];

    asset.regions = vec![
        Region {
            name: "torso".to_string(),
        },
        Region {
            name: "legs".to_string(),
        },
    ];

    let mut material = Material {
        name: "armor".to_string(),
        ..Material::default()
    };
    if version >= 8198 {
        material.texture_path = Some("textures\\armor_d.tif".to_string());
    }
    if version >= 8202 {
        material.permutation = Some("legs".to_string());
        material.region = Some("torso".to_string());
    }
    if version >= 8207 {
        material.lod = Some(0);
    }
    asset.materials = vec![material];

    asset.markers = vec![Marker {
        name: "muzzle".to_string(),
        region: if version >= 8206 { NO_INDEX } else { 0 },
        parent: if version >= 8206 { 1 } else { NO_INDEX },
        rotation: Quat::IDENTITY,
        translation: Vec3::new(0.5, 0.5, 0.5),
        radius: if version >= 8200 { 2.5 } else { 0.0 },
    }];

    if version >= 8201 {
        asset.xref_instances = vec![XrefInstance {
            path: "scenery\\rock.jmf".to_string(),
            name: (version >= 8205).then(|| "rock".to_string()),
        }];
        asset.xref_markers = vec![XrefMarker {
            name: "rock_a".to_string(),
            instance: 0,
            rotation: Quat::IDENTITY,
            translation: Vec3::new(4.0, 0.0, 0.0),
        }];
    }

    asset.vertices = (0..3)
        .map(|i| {
            let influences: Influences = if version >= 8199 {
                smallvec![
                    relic_formats::model::NodeInfluence {
                        node: 0,
                        weight: 0.75
                    },
                    relic_formats::model::NodeInfluence {
                        node: 1,
                        weight: 0.25
                    },
                ]
            } else {
                smallvec![relic_formats::model::NodeInfluence {
                    node: 0,
                    weight: 1.0
                }]
            };
            Vertex {
                position: Vec3::new(i as f32, 0.5, -0.25),
                normal: Vec3::Z,
                color: (version >= 8203).then(|| Vec3::new(0.25, 0.5, 0.75)),
                influences,
                uvs: if version >= 8204 {
                    vec![[0.0, 0.0], [0.5, 0.5]]
                } else {
                    vec![[0.25, 0.75]]
                },
            }
        })
        .collect();

    asset.triangles = vec![
        Triangle {
            region: if version >= 8205 { NO_INDEX } else { 0 },
            material: 0,
            v0: 0,
            v1: 1,
            v2: 2,
        },
        Triangle {
            region: if version >= 8205 { NO_INDEX } else { 1 },
            material: NO_INDEX,
            v0: 2,
            v1: 1,
            v2: 0,
        },
    ];

    if version >= 8208 {
        asset.spheres = vec![Sphere {
            name: "head_shield".to_string(),
            parent: 1,
            material: 0,
            rotation: Quat::IDENTITY,
            translation: Vec3::new(0.0, 0.0, 2.0),
            radius: 0.5,
        }];
        asset.boxes = vec![BoxShape {
            name: "chest".to_string(),
            parent: 0,
            material: NO_INDEX,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            width: 1.0,
            length: 0.5,
            height: 2.0,
        }];
    }
    if version >= 8209 {
        asset.capsules = vec![Capsule {
            name: "thigh".to_string(),
            parent: 2,
            material: NO_INDEX,
            rotation: Quat::IDENTITY,
            translation: Vec3::new(0.0, -0.5, 0.0),
            height: 1.5,
            radius: 0.25,
        }];
        asset.convex_shapes = vec![ConvexShape {
            name: "hull".to_string(),
            parent: 0,
            material: 0,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
        }];
    }
    if version >= 8210 {
        asset.ragdolls = vec![Ragdoll {
            name: "spine_rd".to_string(),
            attached: 1,
            referenced: 0,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            min_twist: -30.0,
            max_twist: 30.0,
            min_cone: -15.0,
            max_cone: 15.0,
            min_plane: -10.0,
            max_plane: 10.0,
        }];
        asset.hinges = vec![Hinge {
            name: "knee".to_string(),
            body_a: 0,
            body_b: 2,
            rotation: Quat::IDENTITY,
            translation: Vec3::new(0.0, 0.0, -1.0),
            min_angle: 0.0,
            max_angle: 120.0,
            friction: 0.5,
        }];
    }
    if version >= 8211 {
        asset.car_wheels = vec![CarWheel {
            name: "wheel_fl".to_string(),
            chassis: 0,
            wheel: 2,
            rotation: Quat::IDENTITY,
            translation: Vec3::new(1.0, 1.5, 0.0),
            suspension_min: -0.25,
            suspension_max: 0.25,
            friction: 0.75,
        }];
        asset.point_to_points = vec![PointToPoint {
            name: "tow".to_string(),
            body_a: 0,
            body_b: 1,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            min_twist: -45.0,
            max_twist: 45.0,
        }];
        asset.prismatics = vec![Prismatic {
            name: "piston".to_string(),
            body_a: 0,
            body_b: 1,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            min_limit: 0.0,
            max_limit: 1.5,
            friction: 0.25,
        }];
    }
    if version >= 8212 {
        asset.bounding_spheres = vec![BoundingSphere {
            translation: Vec3::new(0.0, 0.0, 1.0),
            radius: 3.5,
        }];
    }
    if version >= 8213 {
        asset.skylights = vec![Skylight {
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Vec3::new(1.0, 1.0, 0.75),
            power: 1.25,
        }];
    }

    asset
}

#[test]
fn every_version_roundtrips_in_text() {
    for version in VERSION_MIN..=VERSION_MAX {
        let asset = sample_asset_for(version);
        let bytes = write_model(&asset, version, &WriteOptions::default()).unwrap();
        let parsed = parse_model(&bytes, GameProfile::Modern).unwrap();
        assert!(
            parsed.warnings.is_empty(),
            "v{version} warnings: {:?}",
            parsed.warnings
        );
        assert_eq!(parsed.asset, asset, "text round-trip failed at v{version}");
    }
}

#[test]
fn every_version_roundtrips_in_binary() {
    let opts = WriteOptions {
        binary: true,
        ..WriteOptions::default()
    };
    for version in VERSION_MIN..=VERSION_MAX {
        let asset = sample_asset_for(version);
        let bytes = write_model(&asset, version, &opts).unwrap();
        assert!(bytes.starts_with(b"JMFB"));
        let parsed = parse_model(&bytes, GameProfile::Modern).unwrap();
        assert_eq!(parsed.asset, asset, "binary round-trip failed at v{version}");
    }
}

#[test]
fn verbose_text_roundtrips_too() {
    let opts = WriteOptions {
        comments: true,
        blank_lines: true,
        ..WriteOptions::default()
    };
    for version in [VERSION_MIN, 8205, VERSION_MAX] {
        let asset = sample_asset_for(version);
        let bytes = write_model(&asset, version, &opts).unwrap();
        let parsed = parse_model(&bytes, GameProfile::Modern).unwrap();
        assert_eq!(parsed.asset, asset);
    }
}

/// Parse-then-rewrite must be byte-stable, so repeated tool passes over a
/// file never churn it.
#[test]
fn rewrite_is_byte_identical() {
    for version in [8197, 8204, 8205, 8213] {
        let asset = sample_asset_for(version);
        let first = write_model(&asset, version, &WriteOptions::default()).unwrap();
        let reparsed = parse_model(&first, GameProfile::Modern).unwrap().asset;
        let second = write_model(&reparsed, version, &WriteOptions::default()).unwrap();
        assert_eq!(first, second, "rewrite churned bytes at v{version}");
    }
}

/// A legacy hand-edited file: comments, tab/space mixing, a material -1
/// triangle and a malformed float token that legacy tools tolerated.
#[test]
fn handcrafted_legacy_file_parses() {
    let text = "\
; exported by an old tool
8197
0
1
root\t-1\t-1
0.000000 0.000000 0.000000 1.000000
0.000000 0.000000 0.000000
0
0
1
unnamed
3
0\t0.0 0.0 0.0\t0.0 0.0 1.0\t0.25 0.75
0\t1.0.junk 0.0 0.0\t0.0 0.0 1.0\t0.5 0.75
0\t0.0 1.0 0.0\t0.0 0.0 1.0\t0.25 0.5
1
0 -1 0 1 2
";
    let parsed = parse_model(text.as_bytes(), GameProfile::Classic).unwrap();
    assert!(parsed.warnings.is_empty());
    let asset = parsed.asset;
    assert_eq!(asset.version, 8197);
    assert_eq!(asset.nodes.len(), 1);
    assert_eq!(asset.nodes[0].name, "root");
    assert_eq!(asset.regions[0].name, "unnamed");
    assert_eq!(asset.vertices.len(), 3);
    // The tolerant float fallback truncated "1.0.junk" to 1.0.
    assert_eq!(asset.vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(asset.triangles[0].material, NO_INDEX);

    // Re-export and parse again: identical asset.
    let bytes = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
    let again = parse_model(&bytes, GameProfile::Classic).unwrap().asset;
    assert_eq!(again, asset);
}

/// Writing an old version simply drops the sections it cannot carry.
#[test]
fn downgrade_drops_new_sections() {
    let mut asset = sample_asset_for(8213);
    asset.version = 8197;
    // Older layouts cannot express these.
    for v in &mut asset.vertices {
        v.color = None;
        v.uvs.truncate(1);
        v.influences = smallvec![relic_formats::model::NodeInfluence {
            node: 0,
            weight: 1.0
        }];
    }
    for t in &mut asset.triangles {
        t.region = 0;
    }
    asset.markers[0].radius = 0.0;
    asset.markers[0].region = 0;
    asset.markers[0].parent = NO_INDEX;
    asset.materials[0] = Material {
        name: "armor".to_string(),
        ..Material::default()
    };

    let bytes = write_model(&asset, 8197, &WriteOptions::default()).unwrap();
    let parsed = parse_model(&bytes, GameProfile::Classic).unwrap().asset;
    assert!(parsed.spheres.is_empty());
    assert!(parsed.skylights.is_empty());
    assert!(parsed.xref_instances.is_empty());
    assert_eq!(parsed.nodes, asset.nodes);
    assert_eq!(parsed.vertices, asset.vertices);
}

#[test]
fn upgrade_fills_defaults() {
    let asset = sample_asset_for(8197);
    let bytes = write_model(&asset, 8213, &WriteOptions::default()).unwrap();
    let parsed = parse_model(&bytes, GameProfile::Modern).unwrap().asset;
    assert_eq!(parsed.version, 8213);
    assert_eq!(parsed.nodes, asset.nodes);
    // Absent color is written as zero and comes back explicit.
    assert_eq!(parsed.vertices[0].color, Some(Vec3::ZERO));
    assert!(parsed.spheres.is_empty());
}

#[test]
fn profile_gates_apply_per_consumer() {
    let asset = sample_asset_for(8205);
    let bytes = write_model(&asset, 8205, &WriteOptions::default()).unwrap();
    assert!(parse_model(&bytes, GameProfile::Modern).is_ok());
    assert!(parse_model(&bytes, GameProfile::Enhanced).is_ok());
    assert!(parse_model(&bytes, GameProfile::Classic).is_err());
}
