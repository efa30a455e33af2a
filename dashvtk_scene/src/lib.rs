pub mod builder;
pub mod cells;
pub mod error;
pub mod fields;
mod helpers;
pub mod lexer;
pub mod load;
pub mod node;
pub mod parser;
mod props;
pub mod scene;
pub mod serialize;
pub mod share;

pub use builder::{BuildOptions, NodeBuilder, UnknownPropertyPolicy};
pub use error::{ErrorKind, LoadError, ParseError, SceneError};
pub use lexer::{Lexer, Token};
pub use load::{SourceFormat, load_builder, load_scene};
pub use node::{Property, SceneNode};
pub use parser::{Parser, parse_vtks};
pub use scene::{PostLoadAction, Scene};
pub use serialize::{DEFAULT_NAMESPACE, SerializeOptions};
pub use share::{ShareDeclaration, ShareReference, SharedDataSets};

#[cfg(test)]
mod tests {
    use super::*;
    use dashvtk_ids::{DataSetKey, NodeID};
    use dashvtk_nodes::{HelperType, NodeType, PropertyIssue, node_schema};
    use dashvtk_variant::Variant;
    use serde_json::json;

    fn triangle() -> NodeBuilder {
        NodeBuilder::new(NodeType::PolyData)
            .prop("points", [0, 0, 0, 1, 0, 0, 0, 1, 0])
            .prop("polys", [3, 0, 1, 2])
    }

    fn scalars(values: Vec<f64>) -> NodeBuilder {
        NodeBuilder::new(NodeType::DataArray)
            .prop("registration", "setScalars")
            .prop("values", values)
    }

    fn image_with_scalars(count: usize) -> NodeBuilder {
        NodeBuilder::new(NodeType::ImageData)
            .prop("dimensions", [5, 5, 5])
            .child(
                NodeBuilder::new(NodeType::PointData)
                    .child(scalars((0..count).map(|v| v as f64).collect())),
            )
    }

    fn view(children: impl IntoIterator<Item = NodeBuilder>) -> NodeBuilder {
        NodeBuilder::new(NodeType::View).with_children(children)
    }

    #[test]
    fn builds_single_triangle() {
        let node = triangle().build().unwrap();

        assert_eq!(node.ty(), NodeType::PolyData);
        assert_eq!(node.get_integers("polys"), Some(vec![3, 0, 1, 2]));
        // untouched properties take their documented defaults
        assert_eq!(node.get_str("connectivity"), Some("manual"));
        assert!(!node.is_explicit("lines"));
        assert_eq!(
            fields::shape(&node),
            Some(fields::DataSetShape {
                points: 3,
                cells: 1
            })
        );
    }

    #[test]
    fn rejects_truncated_line_cell() {
        let err = triangle().prop("lines", [3, 0, 1]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert_eq!(err.path(), Some("PolyData"));
    }

    #[test]
    fn rejects_cell_index_past_points() {
        let err = NodeBuilder::new(NodeType::PolyData)
            .prop("points", [0, 0, 0, 1, 0, 0])
            .prop("lines", [2, 0, 2])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProperty);
    }

    #[test]
    fn image_scalars_match_point_count() {
        assert!(image_with_scalars(125).build().is_ok());

        let err = image_with_scalars(124).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert_eq!(err.path(), Some("ImageData/PointData[0]/DataArray[0]"));
    }

    #[test]
    fn cell_data_uses_cell_count() {
        // 5x5x5 points make 4x4x4 cells
        let image = NodeBuilder::new(NodeType::ImageData)
            .prop("dimensions", [5, 5, 5])
            .child(NodeBuilder::new(NodeType::CellData).child(scalars(vec![1.0; 64])));
        assert!(image.build().is_ok());

        let poly = NodeBuilder::new(NodeType::PolyData)
            .prop("points", [0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 1, 0, 2, 0, 0, 2, 1, 0])
            .prop("connectivity", "triangles")
            .child(NodeBuilder::new(NodeType::CellData).child(scalars(vec![0.0, 1.0])));
        assert!(poly.build().is_ok());
    }

    #[test]
    fn data_array_length_must_divide_components() {
        let ok = NodeBuilder::new(NodeType::DataArray)
            .prop("values", [1, 2, 3, 4, 5, 6])
            .prop("numberOfComponents", 3)
            .build();
        assert!(ok.is_ok());

        let err = NodeBuilder::new(NodeType::DataArray)
            .prop("values", [1, 2, 3, 4])
            .prop("numberOfComponents", 3)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    }

    #[test]
    fn integer_arrays_check_range() {
        let err = NodeBuilder::new(NodeType::DataArray)
            .prop("values", [0, 128, 300])
            .prop("type", "Uint8Array")
            .build()
            .unwrap_err();
        assert!(matches!(
            err.innermost(),
            SceneError::InvalidProperty {
                issue: PropertyIssue::OutOfDomain(_),
                ..
            }
        ));
    }

    #[test]
    fn second_scalar_array_is_rejected() {
        let tree = view([NodeBuilder::new(NodeType::GeometryRepresentation).child(
            triangle().child(
                NodeBuilder::new(NodeType::PointData)
                    .child(scalars(vec![0.0, 1.0, 2.0]).prop("name", "a"))
                    .child(scalars(vec![2.0, 1.0, 0.0]).prop("name", "b")),
            ),
        )]);

        let err = tree.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateScalarRegistration);
        assert_eq!(
            err.path(),
            Some("View/GeometryRepresentation[0]/PolyData[0]/PointData[0]/DataArray[1]")
        );

        // plain arrays may coexist with the scalar one
        let tree = view([NodeBuilder::new(NodeType::GeometryRepresentation).child(
            triangle().child(
                NodeBuilder::new(NodeType::PointData)
                    .child(scalars(vec![0.0, 1.0, 2.0]))
                    .child(
                        NodeBuilder::new(NodeType::DataArray)
                            .prop("name", "extra")
                            .prop("values", [1, 1, 1]),
                    ),
            ),
        )]);
        assert!(tree.build().is_ok());
    }

    #[test]
    fn second_normals_array_has_its_own_kind() {
        let normals = |name: &str| {
            NodeBuilder::new(NodeType::DataArray)
                .prop("name", name)
                .prop("registration", "setNormals")
                .prop("numberOfComponents", 3)
                .prop("values", [0, 0, 1, 0, 0, 1, 0, 0, 1])
        };
        let tree = view([NodeBuilder::new(NodeType::GeometryRepresentation).child(
            triangle().child(
                NodeBuilder::new(NodeType::PointData)
                    .child(normals("n1"))
                    .child(normals("n2")),
            ),
        )]);

        let err = tree.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateRegistration);
        assert_eq!(err.kind().to_string(), "duplicate-registration");
        assert_eq!(
            err.path(),
            Some("View/GeometryRepresentation[0]/PolyData[0]/PointData[0]/DataArray[1]")
        );
    }

    #[test]
    fn unknown_property_policy() {
        let tree = view([]).prop("backgroundColor", [0, 0, 0]);
        let err = tree.build().unwrap_err();
        assert_eq!(
            err.innermost(),
            &SceneError::InvalidProperty {
                node: "View",
                name: "backgroundColor".into(),
                issue: PropertyIssue::Unknown
            }
        );

        let node = tree.build_with(&BuildOptions::passthrough()).unwrap();
        assert_eq!(node.get("backgroundColor"), Some(&Variant::from([0, 0, 0])));
    }

    #[test]
    fn rejects_invalid_nesting() {
        let err = view([triangle()]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParentChild);
        assert_eq!(err.path(), Some("View/PolyData[0]"));

        let err = NodeBuilder::new(NodeType::PointData)
            .child(triangle())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParentChild);

        let err = NodeBuilder::new(NodeType::ShareDataSet)
            .child(triangle())
            .child(triangle())
            .build()
            .unwrap_err();
        assert!(matches!(
            err.innermost(),
            SceneError::ChildLimit { max: 1, found: 2, .. }
        ));
    }

    #[test]
    fn slicing_properties_are_exclusive() {
        let slice = NodeBuilder::new(NodeType::SliceRepresentation).prop("kSlice", 4);
        assert!(slice.build().is_ok());

        let err = slice.clone().prop("zSlice", 0.5).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MutuallyExclusive);
        assert_eq!(
            err.innermost(),
            &SceneError::MutuallyExclusive {
                node: "SliceRepresentation",
                group: "slice",
                first: "kSlice",
                second: "zSlice"
            }
        );
    }

    #[test]
    fn omitted_properties_take_defaults() {
        for ty in NodeType::ALL {
            let mut builder = NodeBuilder::new(*ty);
            match ty {
                NodeType::Algorithm => builder.set_prop("vtkClass", "vtkConeSource"),
                NodeType::Reader => builder.set_prop("vtkClass", "vtkSTLReader"),
                _ => {}
            }
            let node = builder.build().unwrap();
            for spec in node_schema(*ty).properties() {
                if node.is_explicit(spec.name) {
                    continue;
                }
                assert_eq!(node.get(spec.name), Some(&spec.default), "{ty}.{}", spec.name);
            }
        }
    }

    #[test]
    fn required_property_missing() {
        let err = NodeBuilder::new(NodeType::Algorithm).build().unwrap_err();
        assert_eq!(
            err.innermost(),
            &SceneError::InvalidProperty {
                node: "Algorithm",
                name: "vtkClass".into(),
                issue: PropertyIssue::Missing
            }
        );
    }

    fn shared_scene(reference: &str) -> NodeBuilder {
        view([
            NodeBuilder::new(NodeType::GeometryRepresentation).child(
                NodeBuilder::new(NodeType::ShareDataSet)
                    .prop("name", "mesh")
                    .child(triangle()),
            ),
            NodeBuilder::new(NodeType::GeometryRepresentation)
                .prop("property", Variant::object_from([("representation", 1)]))
                .child(NodeBuilder::new(NodeType::ShareDataSet).prop("name", reference)),
        ])
    }

    #[test]
    fn resolves_shared_data_set() {
        let scene = Scene::build(&shared_scene("mesh"), &BuildOptions::default()).unwrap();

        let shared = scene.shared();
        assert_eq!(shared.declarations().len(), 1);
        let decl = shared.declaration("mesh").unwrap();
        assert_eq!(decl.key, DataSetKey::from_name("mesh"));
        assert_eq!(
            scene.path(decl.node),
            Some("View/GeometryRepresentation[0]/ShareDataSet[0]")
        );

        let reference = &shared.references()[0];
        assert_eq!(reference.target, decl.node);
        assert_eq!(shared.target_of(reference.node), Some(decl.node));
        // the reference holds no copy of the geometry
        assert!(scene.node(reference.node).unwrap().children().is_empty());
    }

    #[test]
    fn rejects_unmatched_or_ambiguous_share() {
        let err = Scene::build(&shared_scene("other"), &BuildOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
        assert_eq!(
            err.path(),
            Some("View/GeometryRepresentation[1]/ShareDataSet[0]")
        );

        let twice = shared_scene("mesh").child(
            NodeBuilder::new(NodeType::GeometryRepresentation).child(
                NodeBuilder::new(NodeType::ShareDataSet)
                    .prop("name", "mesh")
                    .child(triangle()),
            ),
        );
        let err = Scene::build(&twice, &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err.innermost(),
            SceneError::AmbiguousReference { count: 2, .. }
        ));
    }

    #[test]
    fn scene_root_must_be_view() {
        let node = triangle().build().unwrap();
        assert!(matches!(
            Scene::new(node),
            Err(SceneError::RootNotView(NodeType::PolyData))
        ));
    }

    #[test]
    fn assigns_preorder_ids() {
        let scene = Scene::build(&shared_scene("mesh"), &BuildOptions::default()).unwrap();
        // View, Rep, Share, PolyData, Rep, Share
        assert_eq!(scene.node_count(), 6);
        let types: Vec<NodeType> = scene
            .ids()
            .map(|id| scene.node(id).unwrap().ty())
            .collect();
        assert_eq!(
            types,
            vec![
                NodeType::View,
                NodeType::GeometryRepresentation,
                NodeType::ShareDataSet,
                NodeType::PolyData,
                NodeType::GeometryRepresentation,
                NodeType::ShareDataSet,
            ]
        );
        assert_eq!(scene.ids().next(), Some(NodeID::new(1)));
        assert!(scene.node(NodeID::nil()).is_none());
    }

    #[test]
    fn triggers_report_changes() {
        let mut scene = Scene::build(&view([]), &BuildOptions::default()).unwrap();
        let root = NodeID::new(1);

        assert_eq!(scene.set_trigger(root, "triggerRender", 1700000000), Ok(true));
        assert_eq!(scene.set_trigger(root, "triggerRender", 1700000000), Ok(false));
        assert_eq!(scene.set_trigger(root, "triggerResetCamera", 5), Ok(true));
        assert_eq!(
            scene.root().get("triggerRender"),
            Some(&Variant::from(1700000000))
        );

        let err = scene
            .set_trigger(root, "background", [0, 0, 0])
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidProperty {
                issue: PropertyIssue::NotATrigger,
                ..
            }
        ));
        assert!(scene.set_trigger(NodeID::new(9), "triggerRender", 1).is_err());
    }

    #[test]
    fn integral_and_float_timestamps_are_equal() {
        let mut scene = Scene::build(&view([]), &BuildOptions::default()).unwrap();
        let root = NodeID::new(1);

        assert_eq!(scene.set_trigger(root, "triggerRender", 5), Ok(true));
        assert_eq!(scene.set_trigger(root, "triggerRender", 5.0), Ok(false));
        assert_eq!(scene.set_trigger(root, "triggerRender", 5.5), Ok(true));
        assert_eq!(scene.set_trigger(root, "triggerRender", 5.5f32), Ok(false));
    }

    #[test]
    fn reader_post_load_actions() {
        let tree = view([NodeBuilder::new(NodeType::GeometryRepresentation).child(
            NodeBuilder::new(NodeType::Reader)
                .prop("vtkClass", "vtkSTLReader")
                .prop("url", "https://example.com/part.stl")
                .prop("resetCameraOnUpdate", false),
        )]);
        let scene = Scene::build(&tree, &BuildOptions::default()).unwrap();

        let actions = scene.post_load_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].vtk_class, "vtkSTLReader");
        assert!(actions[0].render);
        assert!(!actions[0].reset_camera);
        assert_eq!(actions[0].path, "View/GeometryRepresentation[0]/Reader[0]");

        let both = NodeBuilder::new(NodeType::Reader)
            .prop("vtkClass", "vtkSTLReader")
            .prop("url", "a.stl")
            .prop("parseAsText", "solid");
        assert_eq!(both.build().unwrap_err().kind(), ErrorKind::MutuallyExclusive);
    }

    #[test]
    fn serializes_dash_components() {
        let scene = Scene::build(&shared_scene("mesh"), &BuildOptions::default()).unwrap();
        let out = scene.to_json(&SerializeOptions::default());

        let layout = &out["layout"];
        assert_eq!(layout["namespace"], "dash_vtk");
        assert_eq!(layout["type"], "View");
        assert_eq!(layout["props"]["background"], json!([0.32, 0.34, 0.43]));
        // read-only and unset properties are not written
        assert!(layout["props"].get("clickInfo").is_none());
        assert!(layout["props"].get("id").is_none());

        let rep = &layout["props"]["children"][1];
        assert_eq!(rep["props"]["property"]["representation"], 1);
        assert_eq!(rep["props"]["property"]["opacity"], 1);

        assert_eq!(out["sharedDataSets"][0]["name"], "mesh");
        assert_eq!(
            out["sharedDataSets"][0]["key"],
            DataSetKey::from_name("mesh").to_hex()
        );
        assert_eq!(out["sharedDataSets"][0]["references"], json!([6]));
    }

    #[test]
    fn explicit_only_serialization_round_trips() {
        let node = shared_scene("mesh").build().unwrap();
        let options = SerializeOptions {
            include_defaults: false,
            ..SerializeOptions::default()
        };
        let out = node.to_dash_json(&options);
        assert_eq!(out["props"].as_object().map(|p| p.len()), Some(1));

        let rebuilt = NodeBuilder::from_dash_json(&out).unwrap().build().unwrap();
        assert_eq!(rebuilt, node);
    }

    #[test]
    fn reads_dash_json() {
        let input = json!({
            "namespace": "dash_vtk",
            "type": "View",
            "props": {
                "cameraPosition": [1, 2, 3],
                "children": {
                    "type": "GeometryRepresentation",
                    "props": {
                        "children": [
                            { "type": "Algorithm", "props": { "vtkClass": "vtkSphereSource" } }
                        ]
                    }
                }
            }
        });
        let node = NodeBuilder::from_dash_json(&input).unwrap().build().unwrap();
        assert_eq!(node.children()[0].children()[0].ty(), NodeType::Algorithm);

        let bad = json!({ "type": "Cone" });
        assert!(matches!(
            NodeBuilder::from_dash_json(&bad),
            Err(LoadError::Scene(_))
        ));
        assert!(matches!(
            NodeBuilder::from_dash_json(&json!([1])),
            Err(LoadError::Shape { .. })
        ));
    }

    const VOLUME_SCENE: &str = r#"
        # 2x2x2 volume shared through a variable
        @dims = (2, 2, 2)
        @values = (0, 1, 2, 3, 4, 5, 6, 7.5)

        [View]
            background = (0, 0, 0)
            cameraParallelProjection = true
            [VolumeRepresentation]
                colorMapPreset = "Grayscale"
                [VolumeController]
                    size = (300, 100)
                [/VolumeController]
                [ImageData]
                    dimensions = @dims
                    spacing = (0.5, 0.5, 0.5)
                    [PointData]
                        [DataArray]
                            registration = "setScalars"
                            values = @values
                        [/DataArray]
                    [/PointData]
                [/ImageData]
            [/VolumeRepresentation]
        [/View]
    "#;

    #[test]
    fn parse_volume_scene() {
        let builder = parse_vtks(VOLUME_SCENE).unwrap();
        let scene = Scene::build(&builder, &BuildOptions::default()).unwrap();

        print!("{:#?}", scene.root());

        // root
        assert_eq!(scene.root().get_bool("cameraParallelProjection"), Some(true));
        assert_eq!(scene.node_count(), 6);

        // variables resolve to the same values
        let image = &scene.root().children()[0].children()[1];
        assert_eq!(image.get_integers("dimensions"), Some(vec![2, 2, 2]));
        let array = &image.children()[0].children()[0];
        assert_eq!(array.get_numbers("values").map(|v| v[7]), Some(7.5));
    }

    #[test]
    fn parse_helpers_and_objects() {
        let src = r#"
            [View]
                [GeometryRepresentation]
                    property = { edgeVisibility = true, "opacity" = 0.25 }
                    [Mesh]
                        state = {
                            mesh = { points = (0, 0, 0, 1, 0, 0, 0, 1, 0), polys = (3, 0, 1, 2) }
                            field = { name = "temp", values = (1, 2, 3), location = "PointData" }
                        }
                    [/Mesh]
                [/GeometryRepresentation]
            [/View]
        "#;
        let node = parse_vtks(src).unwrap().build().unwrap();

        let rep = &node.children()[0];
        assert_eq!(rep.get("property").and_then(|p| p.get("opacity")), Some(&Variant::from(0.25)));
        let poly = &rep.children()[0];
        assert_eq!(poly.ty(), NodeType::PolyData);
        let array = &poly.children()[0].children()[0];
        assert_eq!(array.get_str("name"), Some("temp"));
        assert_eq!(array.get_str("registration"), Some("setScalars"));
    }

    #[test]
    fn mesh_field_location_picks_container() {
        let mesh = |location: &str| {
            NodeBuilder::new(HelperType::Mesh).prop(
                "state",
                Variant::object_from([
                    (
                        "mesh",
                        Variant::object_from([
                            ("points", Variant::from([0, 0, 0, 1, 0, 0, 0, 1, 0])),
                            ("polys", Variant::from([3, 0, 1, 2])),
                        ]),
                    ),
                    (
                        "field",
                        Variant::object_from([
                            ("values", Variant::from([7])),
                            ("location", Variant::from(location)),
                        ]),
                    ),
                ]),
            )
        };

        let poly = mesh("CellData").build().unwrap();
        assert_eq!(poly.children()[0].ty(), NodeType::CellData);

        let err = mesh("FieldData").build().unwrap_err();
        match err.innermost() {
            SceneError::InvalidProperty { name, issue, .. } => {
                assert_eq!(name, "state.field.location");
                assert_eq!(
                    issue,
                    &PropertyIssue::OutOfDomain(
                        "`FieldData` is not one of: PointData, CellData".to_string()
                    )
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn finds_nodes_by_dom_id() {
        let tree = view([NodeBuilder::new(NodeType::GeometryRepresentation)
            .prop("id", "rep")
            .child(triangle().prop("id", "tri"))]);
        let scene = Scene::build(&tree, &BuildOptions::default()).unwrap();

        let tri = scene.find_by_dom_id("tri").unwrap();
        assert_eq!(tri, NodeID::new(3));
        assert_eq!(scene.path(tri), Some("View/GeometryRepresentation[0]/PolyData[0]"));
        assert_eq!(scene.find_by_dom_id("rep"), Some(NodeID::new(2)));
        assert_eq!(scene.find_by_dom_id("missing"), None);
    }

    #[test]
    fn parse_errors_carry_lines() {
        let err = parse_vtks("[View]\n  [GeometryRepresentation]\n  [/View]\n").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_vtks("[View]\n background = @missing\n[/View]").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("@missing"));

        assert!(parse_vtks("[View][/View]\n[View][/View]").is_err());
        assert!(parse_vtks("@x = 1").is_err());
        assert!(parse_vtks("[Teapot][/Teapot]").is_err());
        assert!(parse_vtks("[View]\n a = 1\n a = 2\n[/View]").is_err());
    }

    #[test]
    fn repeated_object_key_is_rejected() {
        let err = parse_vtks("[View]\n background = (0, 0, 0)\n cameraPosition = { a = 1,\n a = 2 }\n[/View]")
            .unwrap_err();
        assert_eq!(err.line, 4);
        assert!(err.message.contains("`a`"), "{}", err.message);
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let depth = 200_000;
        let src = format!(
            "[View]\n background = {}1{}\n[/View]",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let err = parse_vtks(&src).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("nesting too deep"), "{}", err.message);

        let braces = format!("[View]\n a = {}\n[/View]", "{ b = ".repeat(depth));
        assert!(parse_vtks(&braces).unwrap_err().message.contains("nesting too deep"));

        let mut blocks = String::new();
        for _ in 0..1000 {
            blocks.push_str("[View]\n");
        }
        assert!(parse_vtks(&blocks).unwrap_err().message.contains("nesting too deep"));

        let shallow = format!("[View]\n background = {}1{}\n[/View]", "(".repeat(50), ")".repeat(50));
        assert!(parse_vtks(&shallow).is_ok());
    }

    #[test]
    fn point_cloud_expands_to_primitives() {
        let cloud = NodeBuilder::new(HelperType::PointCloudRepresentation)
            .prop("xyz", [0, 0, 0, 1, 1, 1])
            .prop("rgb", [255, 0, 0, 0, 255, 0]);
        let node = view([cloud.clone()]).build().unwrap();

        let rep = &node.children()[0];
        assert_eq!(rep.ty(), NodeType::GeometryRepresentation);
        let poly = &rep.children()[0];
        assert_eq!(poly.get_str("connectivity"), Some("points"));
        let array = &poly.children()[0].children()[0];
        assert_eq!(array.get_str("type"), Some("Uint8Array"));
        assert_eq!(array.get("numberOfComponents"), Some(&Variant::from(3)));

        let err = cloud.prop("scalars", [1, 2]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MutuallyExclusive);
    }

    #[test]
    fn volume_data_representation_expands() {
        let helper = NodeBuilder::new(HelperType::VolumeDataRepresentation)
            .prop("dimensions", [2, 2, 1])
            .prop("scalars", [0, 1, 2, 3])
            .prop("controllerSize", [200, 100]);
        let node = helper.build().unwrap();

        assert_eq!(node.ty(), NodeType::VolumeRepresentation);
        let controller = &node.children()[0];
        assert_eq!(controller.ty(), NodeType::VolumeController);
        assert_eq!(controller.get("size"), Some(&Variant::from([200, 100])));
        assert_eq!(node.children()[1].ty(), NodeType::ImageData);

        let without = NodeBuilder::new(HelperType::VolumeDataRepresentation)
            .prop("dimensions", [2, 2, 1])
            .prop("scalars", [0, 1, 2, 3])
            .prop("volumeController", false)
            .build()
            .unwrap();
        assert_eq!(without.children().len(), 1);

        // scalar count is still checked after expansion
        let err = NodeBuilder::new(HelperType::VolumeDataRepresentation)
            .prop("dimensions", [2, 2, 2])
            .prop("scalars", [0, 1, 2])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    }

    #[test]
    fn volume_helper_defaults_to_scalars() {
        let volume = NodeBuilder::new(HelperType::Volume).prop(
            "state",
            Variant::object_from([
                ("image", Variant::object_from([("dimensions", [2, 1, 1])])),
                ("field", Variant::object_from([("values", [4, 5])])),
            ]),
        );
        let node = volume.build().unwrap();
        assert_eq!(node.ty(), NodeType::ImageData);
        let array = &node.children()[0].children()[0];
        assert_eq!(array.get_str("registration"), Some("setScalars"));

        let err = NodeBuilder::new(HelperType::Volume)
            .prop("state", Variant::object())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProperty);
    }

    #[test]
    fn load_scene_from_either_format() {
        let scene = load_scene(VOLUME_SCENE, SourceFormat::Vtks, &BuildOptions::default()).unwrap();
        let text = scene.to_json(&SerializeOptions::default()).to_string();

        // defaults come back as explicit values, so compare the output
        let again = load_scene(&text, SourceFormat::Json, &BuildOptions::default()).unwrap();
        let options = SerializeOptions::default();
        assert_eq!(
            again.root().to_dash_json(&options),
            scene.root().to_dash_json(&options)
        );

        assert!(matches!(
            load_scene("{", SourceFormat::Json, &BuildOptions::default()),
            Err(LoadError::Json(_))
        ));
        assert_eq!(
            SourceFormat::from_path(std::path::Path::new("a/scene.JSON")),
            SourceFormat::Json
        );
    }
}
