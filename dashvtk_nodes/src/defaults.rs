//! Documented default values shared between several node schemas.
//!
//! Enumerated vtk.js constants are kept numeric, the way the client expects
//! them (`representation: 2` is SURFACE, `interpolation: 1` is GOURAUD).

use dashvtk_variant::Variant;

pub const ALGORITHM_CLASSES: &[&str] = &[
    "vtkConcentricCylinderSource",
    "vtkConeSource",
    "vtkCubeSource",
    "vtkCylinderSource",
    "vtkLineSource",
    "vtkPlaneSource",
    "vtkPointSource",
    "vtkSphereSource",
    "vtkWarpScalar",
];

pub const READER_CLASSES: &[&str] = &[
    "vtkPLYReader",
    "vtkSTLReader",
    "vtkElevationReader",
    "vtkOBJReader",
    "vtkPDBReader",
    "vtkXMLImageDataReader",
    "vtkXMLPolyDataReader",
];

pub const REGISTRATIONS: &[&str] = &[
    "addArray",
    "setScalars",
    "setNormals",
    "setVectors",
    "setTCoords",
    "setTensors",
    "setGlobalIds",
    "setPedigreeIds",
];

pub const CONNECTIVITY_MODES: &[&str] = &["manual", "points", "triangles", "strips"];

pub const PICKING_MODES: &[&str] = &["click", "hover"];

pub const FIELD_LOCATIONS: &[&str] = &["PointData", "CellData"];

pub const DEFAULT_COLOR_MAP: &str = "erdc_rainbow_bright";

pub fn view_background() -> Variant {
    Variant::from([0.32, 0.34, 0.43])
}

fn interaction(button: u8, action: &str, modifiers: &[(&str, bool)]) -> Variant {
    let mut entry = Variant::object_from([
        ("button", Variant::from(button)),
        ("action", Variant::from(action)),
    ]);
    if let Some(map) = entry.as_object_mut() {
        for (key, on) in modifiers {
            map.insert((*key).into(), Variant::from(*on));
        }
    }
    entry
}

/// Mouse bindings installed on a View unless overridden.
pub fn interactor_settings() -> Variant {
    Variant::Array(vec![
        interaction(1, "Rotate", &[]),
        interaction(2, "Pan", &[]),
        interaction(3, "Zoom", &[("scrollEnabled", true)]),
        interaction(1, "Pan", &[("shift", true)]),
        interaction(1, "Zoom", &[("alt", true)]),
        interaction(1, "ZoomToMouse", &[("control", true)]),
        interaction(1, "Roll", &[("alt", true), ("shift", true)]),
    ])
}

pub fn actor() -> Variant {
    Variant::object_from([
        ("origin", Variant::from([0, 0, 0])),
        ("position", Variant::from([0, 0, 0])),
        ("scale", Variant::from([1, 1, 1])),
        ("orientation", Variant::from([0, 0, 0])),
        ("visibility", Variant::from(1)),
        ("pickable", Variant::from(1)),
        ("dragable", Variant::from(1)),
    ])
}

pub fn geometry_property() -> Variant {
    Variant::object_from([
        ("lighting", Variant::from(true)),
        ("interpolation", Variant::from(1)),
        ("ambient", Variant::from(0)),
        ("diffuse", Variant::from(1)),
        ("specular", Variant::from(0)),
        ("specularPower", Variant::from(1)),
        ("opacity", Variant::from(1)),
        ("edgeVisibility", Variant::from(false)),
        ("lineWidth", Variant::from(1)),
        ("pointSize", Variant::from(1)),
        ("backfaceCulling", Variant::from(false)),
        ("frontfaceCulling", Variant::from(false)),
        ("representation", Variant::from(2)),
        ("color", Variant::from([1, 1, 1])),
        ("ambientColor", Variant::from([1, 1, 1])),
        ("diffuseColor", Variant::from([1, 1, 1])),
        ("specularColor", Variant::from([1, 1, 1])),
        ("edgeColor", Variant::from([0, 0, 0])),
    ])
}

pub fn geometry_mapper() -> Variant {
    Variant::object_from([
        ("static", Variant::from(false)),
        ("scalarVisibility", Variant::from(true)),
        ("scalarRange", Variant::from([0, 1])),
        ("useLookupTableScalarRange", Variant::from(false)),
        ("colorMode", Variant::from(0)),
        ("scalarMode", Variant::from(0)),
        ("arrayAccessMode", Variant::from(1)),
        ("colorByArrayName", Variant::from("")),
        ("interpolateScalarsBeforeMapping", Variant::from(false)),
        ("useInvertibleColors", Variant::from(false)),
        ("fieldDataTupleId", Variant::from(-1)),
        ("customShaderAttributes", Variant::array()),
    ])
}

pub fn glyph_mapper() -> Variant {
    let mut mapper = geometry_mapper();
    mapper.merge_object(&Variant::object_from([
        ("orient", Variant::from(true)),
        ("orientationMode", Variant::from(0)),
        ("scaling", Variant::from(true)),
        ("scaleFactor", Variant::from(1.0)),
        ("scaleMode", Variant::from(1)),
    ]));
    mapper
}

pub fn volume_property() -> Variant {
    Variant::object_from([
        ("independentComponents", Variant::from(true)),
        ("interpolationType", Variant::from(2)),
        ("shade", Variant::from(0)),
        ("ambient", Variant::from(0.1)),
        ("diffuse", Variant::from(0.7)),
        ("specular", Variant::from(0.2)),
        ("specularPower", Variant::from(10.0)),
        ("useLabelOutline", Variant::from(false)),
        ("labelOutlineThickness", Variant::from(1)),
    ])
}

pub fn volume_mapper() -> Variant {
    Variant::object_from([
        ("sampleDistance", Variant::from(1.0)),
        ("imageSampleDistance", Variant::from(1.0)),
        ("maximumSamplesPerRay", Variant::from(1000)),
        ("autoAdjustSampleDistances", Variant::from(true)),
        ("blendMode", Variant::from(0)),
        ("averageIPScalarRange", Variant::from([-1000000.0, 1000000.0])),
    ])
}

pub fn image_property() -> Variant {
    Variant::object_from([
        ("independentComponents", Variant::from(false)),
        ("interpolationType", Variant::from(1)),
        ("colorWindow", Variant::from(255)),
        ("colorLevel", Variant::from(127.5)),
        ("ambient", Variant::from(1.0)),
        ("diffuse", Variant::from(0.0)),
        ("opacity", Variant::from(1.0)),
    ])
}

pub fn image_mapper() -> Variant {
    Variant::object_from([
        ("customDisplayExtent", Variant::from([0, 0, 0, 0])),
        ("useCustomExtents", Variant::from(false)),
        ("slice", Variant::from(0)),
        ("slicingMode", Variant::from(-1)),
        (
            "closestIJKAxis",
            Variant::object_from([
                ("ijkMode", Variant::from(-1)),
                ("flip", Variant::from(false)),
            ]),
        ),
        ("renderToRectangle", Variant::from(false)),
        ("sliceAtFocalPoint", Variant::from(false)),
    ])
}

pub fn identity_direction() -> Variant {
    Variant::from([1, 0, 0, 0, 1, 0, 0, 0, 1])
}
