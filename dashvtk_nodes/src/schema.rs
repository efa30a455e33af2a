use dashvtk_variant::Variant;
use once_cell::sync::Lazy;

use crate::defaults;
use crate::domain::{Domain, PropertyIssue};
use crate::node_type::{HelperType, NodeType};
use crate::typed_array::TypedArrayKind;

/// How a property may be written after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Normal,
    /// Externally settable timestamp; a change asks the client to act.
    Trigger,
    /// Written by the client (pick results); never accepted as input.
    ReadOnly,
}

#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: &'static str,
    pub domain: Domain,
    pub default: Variant,
    pub access: Access,
    pub required: bool,
    /// Null is accepted (and is the default) when set.
    pub nullable: bool,
    /// Object values are merged over `default` instead of replacing it.
    pub merge_default: bool,
    /// Mutual-exclusion group: at most one member may be set.
    pub group: Option<&'static str>,
    pub doc: &'static str,
}

impl PropertySpec {
    pub fn new(name: &'static str, domain: Domain, default: impl Into<Variant>) -> Self {
        Self {
            name,
            domain,
            default: default.into(),
            access: Access::Normal,
            required: false,
            nullable: false,
            merge_default: false,
            group: None,
            doc: "",
        }
    }

    /// Unset unless the user provides a value.
    pub fn optional(name: &'static str, domain: Domain) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, domain, Variant::Null)
        }
    }

    pub fn required(name: &'static str, domain: Domain) -> Self {
        Self {
            required: true,
            ..Self::new(name, domain, Variant::Null)
        }
    }

    pub fn trigger(mut self) -> Self {
        self.access = Access::Trigger;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    pub fn merged(mut self) -> Self {
        self.merge_default = true;
        self
    }

    pub fn exclusive(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.access == Access::Trigger
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }

    /// Checks a user-supplied value; returns the value to store.
    pub fn accept(&self, value: Variant) -> Result<Variant, PropertyIssue> {
        if self.is_read_only() {
            return Err(PropertyIssue::ReadOnly);
        }
        if value.is_null() {
            return if self.nullable {
                Ok(value)
            } else if self.required {
                Err(PropertyIssue::Missing)
            } else {
                Err(PropertyIssue::TypeMismatch {
                    expected: self.domain.expected(),
                    found: value.kind(),
                })
            };
        }
        self.domain.check(&value)?;
        if self.merge_default {
            let mut merged = self.default.clone();
            if merged.merge_object(&value) {
                return Ok(merged);
            }
        }
        Ok(value)
    }
}

/// Ordered property table of one node or helper type.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    pub tag: &'static str,
    properties: Vec<PropertySpec>,
}

impl NodeSchema {
    fn new(tag: &'static str, properties: Vec<PropertySpec>) -> Self {
        let mut all = Vec::with_capacity(properties.len() + 1);
        all.push(PropertySpec::optional("id", Domain::String).doc("component id"));
        all.extend(properties);
        Self {
            tag,
            properties: all,
        }
    }

    #[inline]
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Members of a mutual-exclusion group, in schema order.
    pub fn group_members<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a PropertySpec> + 'a {
        self.properties.iter().filter(move |p| p.group == Some(group))
    }

    pub fn groups(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for g in self.properties.iter().filter_map(|p| p.group) {
            if !out.contains(&g) {
                out.push(g);
            }
        }
        out
    }
}

static NODE_SCHEMAS: Lazy<Vec<NodeSchema>> =
    Lazy::new(|| NodeType::ALL.iter().map(|ty| build_node_schema(*ty)).collect());

static HELPER_SCHEMAS: Lazy<Vec<NodeSchema>> = Lazy::new(|| {
    HelperType::ALL
        .iter()
        .map(|ty| build_helper_schema(*ty))
        .collect()
});

pub fn node_schema(ty: NodeType) -> &'static NodeSchema {
    &NODE_SCHEMAS[ty.index()]
}

pub fn helper_schema(ty: HelperType) -> &'static NodeSchema {
    &HELPER_SCHEMAS[ty.index()]
}

fn color_props() -> [PropertySpec; 2] {
    [
        PropertySpec::new("colorMapPreset", Domain::String, defaults::DEFAULT_COLOR_MAP)
            .doc("lookup table preset name"),
        PropertySpec::new("colorDataRange", Domain::VEC2, [0, 1])
            .doc("scalar range mapped onto the preset"),
    ]
}

fn actor_prop(name: &'static str) -> PropertySpec {
    PropertySpec::new(name, Domain::Object, defaults::actor())
        .merged()
        .doc("actor settings")
}

const POSITIVE_INT: Domain = Domain::Integer {
    min: Some(1),
    max: None,
};

fn build_node_schema(ty: NodeType) -> NodeSchema {
    let props = match ty {
        NodeType::View => vec![
            PropertySpec::new("background", Domain::VEC3, defaults::view_background())
                .doc("RGB background color"),
            PropertySpec::new(
                "interactorSettings",
                Domain::ObjectArray,
                defaults::interactor_settings(),
            )
            .doc("mouse and keyboard bindings"),
            PropertySpec::new("cameraPosition", Domain::VEC3, [0, 0, 1]),
            PropertySpec::new("cameraViewUp", Domain::VEC3, [0, 1, 0]),
            PropertySpec::new("cameraParallelProjection", Domain::Bool, false),
            PropertySpec::new("triggerRender", Domain::NUMBER, 0)
                .trigger()
                .doc("timestamp; changing it re-renders"),
            PropertySpec::new("triggerResetCamera", Domain::NUMBER, 0)
                .trigger()
                .doc("timestamp; changing it resets the camera"),
            PropertySpec::new(
                "pickingModes",
                Domain::StringSet(defaults::PICKING_MODES),
                Variant::array(),
            ),
            PropertySpec::optional("clickInfo", Domain::Object).read_only(),
            PropertySpec::optional("hoverInfo", Domain::Object).read_only(),
            PropertySpec::new("style", Domain::Object, Variant::object()),
            PropertySpec::new("className", Domain::String, ""),
        ],
        NodeType::GeometryRepresentation => {
            let mut props = vec![
                actor_prop("actor"),
                PropertySpec::new("property", Domain::Object, defaults::geometry_property())
                    .merged()
                    .doc("surface property settings"),
                PropertySpec::new("mapper", Domain::Object, defaults::geometry_mapper())
                    .merged()
                    .doc("mapper settings"),
            ];
            props.extend(color_props());
            props.push(PropertySpec::new("showCubeAxes", Domain::Bool, false));
            props.push(PropertySpec::new("cubeAxesStyle", Domain::Object, Variant::object()));
            props
        }
        NodeType::GlyphRepresentation => {
            let mut props = vec![
                actor_prop("actor"),
                PropertySpec::new("property", Domain::Object, defaults::geometry_property())
                    .merged(),
                PropertySpec::new("mapper", Domain::Object, defaults::glyph_mapper())
                    .merged()
                    .doc("glyph mapper settings"),
            ];
            props.extend(color_props());
            props
        }
        NodeType::VolumeRepresentation => {
            let mut props = vec![
                actor_prop("volume"),
                PropertySpec::new("property", Domain::Object, defaults::volume_property())
                    .merged()
                    .doc("volume property settings"),
                PropertySpec::new("mapper", Domain::Object, defaults::volume_mapper())
                    .merged()
                    .doc("ray-cast mapper settings"),
            ];
            props.extend(color_props());
            props
        }
        NodeType::SliceRepresentation => {
            let index = Domain::Integer {
                min: Some(0),
                max: None,
            };
            let mut props = vec![
                PropertySpec::optional("iSlice", index).exclusive("slice"),
                PropertySpec::optional("jSlice", index).exclusive("slice"),
                PropertySpec::optional("kSlice", index).exclusive("slice"),
                PropertySpec::optional("xSlice", Domain::NUMBER).exclusive("slice"),
                PropertySpec::optional("ySlice", Domain::NUMBER).exclusive("slice"),
                PropertySpec::optional("zSlice", Domain::NUMBER).exclusive("slice"),
                actor_prop("actor"),
                PropertySpec::new("property", Domain::Object, defaults::image_property())
                    .merged()
                    .doc("image property settings"),
                PropertySpec::new("mapper", Domain::Object, defaults::image_mapper())
                    .merged()
                    .doc("image mapper settings"),
            ];
            props.extend(color_props());
            props
        }
        NodeType::VolumeController => vec![
            PropertySpec::new("size", Domain::VEC2, [400, 150]).doc("widget size in pixels"),
            PropertySpec::new("rescaleColorMap", Domain::Bool, false),
        ],
        NodeType::Algorithm => vec![
            PropertySpec::required("vtkClass", Domain::OneOf(defaults::ALGORITHM_CLASSES))
                .doc("vtk.js source or filter class"),
            PropertySpec::new("state", Domain::Object, Variant::object())
                .doc("properties set on the vtk object"),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
        NodeType::Reader => vec![
            PropertySpec::required("vtkClass", Domain::OneOf(defaults::READER_CLASSES))
                .doc("vtk.js reader class"),
            PropertySpec::optional("url", Domain::String).exclusive("input"),
            PropertySpec::optional("parseAsText", Domain::String).exclusive("input"),
            PropertySpec::optional("parseAsArrayBuffer", Domain::String)
                .exclusive("input")
                .doc("base64 encoded content"),
            PropertySpec::new("renderOnUpdate", Domain::Bool, true),
            PropertySpec::new("resetCameraOnUpdate", Domain::Bool, true),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
        NodeType::ImageData => vec![
            PropertySpec::new("origin", Domain::VEC3, [0, 0, 0]),
            PropertySpec::new(
                "dimensions",
                Domain::IntegerArray {
                    len: Some(3),
                    min: Some(1),
                },
                [1, 1, 1],
            )
            .doc("number of points along i, j, k"),
            PropertySpec::new("spacing", Domain::VEC3, [1, 1, 1]),
            PropertySpec::new(
                "direction",
                Domain::NumberArray { len: Some(9) },
                defaults::identity_direction(),
            ),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
        NodeType::PolyData => {
            let cells = Domain::IntegerArray {
                len: None,
                min: Some(0),
            };
            vec![
                PropertySpec::new("points", Domain::NUMBERS, Variant::array())
                    .doc("flat xyz coordinates"),
                PropertySpec::new("verts", cells, Variant::array()),
                PropertySpec::new("lines", cells, Variant::array()),
                PropertySpec::new("polys", cells, Variant::array()),
                PropertySpec::new("strips", cells, Variant::array()),
                PropertySpec::new(
                    "connectivity",
                    Domain::OneOf(defaults::CONNECTIVITY_MODES),
                    "manual",
                )
                .doc("derive cells from points unless manual"),
                PropertySpec::new("port", Domain::PORT, 0),
            ]
        }
        NodeType::PointData | NodeType::CellData | NodeType::FieldData => Vec::new(),
        NodeType::DataArray => vec![
            PropertySpec::new("name", Domain::String, "scalars"),
            PropertySpec::new(
                "registration",
                Domain::OneOf(defaults::REGISTRATIONS),
                "addArray",
            )
            .doc("role of the array in its container"),
            PropertySpec::new("values", Domain::NUMBERS, Variant::array()),
            PropertySpec::new("numberOfComponents", POSITIVE_INT, 1),
            PropertySpec::new("type", Domain::OneOf(TypedArrayKind::NAMES), "Float32Array"),
        ],
        NodeType::ShareDataSet => vec![
            PropertySpec::new("name", Domain::String, "default")
                .doc("declaration or reference name"),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
    };
    NodeSchema::new(ty.as_str(), props)
}

fn field_choice(name: &'static str) -> PropertySpec {
    PropertySpec::optional(name, Domain::NUMBERS).exclusive("field")
}

fn build_helper_schema(ty: HelperType) -> NodeSchema {
    let props = match ty {
        HelperType::Mesh => vec![
            PropertySpec::required("state", Domain::Object)
                .doc("{ mesh: PolyData props, field: DataArray props }"),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
        HelperType::Volume => vec![
            PropertySpec::required("state", Domain::Object)
                .doc("{ image: ImageData props, field: DataArray props }"),
            PropertySpec::new("port", Domain::PORT, 0),
        ],
        HelperType::PointCloudRepresentation => {
            let mut props = vec![
                PropertySpec::required("xyz", Domain::NUMBERS).doc("flat point coordinates"),
                field_choice("rgb"),
                field_choice("rgba"),
                field_choice("scalars"),
            ];
            props.extend(color_props());
            props.push(PropertySpec::optional("property", Domain::Object));
            props
        }
        HelperType::VolumeDataRepresentation => {
            let mut props = vec![
                PropertySpec::required(
                    "dimensions",
                    Domain::IntegerArray {
                        len: Some(3),
                        min: Some(1),
                    },
                ),
                PropertySpec::new("spacing", Domain::VEC3, [1, 1, 1]),
                PropertySpec::new("origin", Domain::VEC3, [0, 0, 0]),
                field_choice("rgb"),
                field_choice("rgba"),
                field_choice("scalars"),
                PropertySpec::new("scalarsType", Domain::OneOf(TypedArrayKind::NAMES), "Float32Array"),
                PropertySpec::optional("mapper", Domain::Object),
                PropertySpec::optional("volume", Domain::Object),
                PropertySpec::optional("property", Domain::Object),
            ];
            props.extend(color_props());
            props.push(PropertySpec::new("volumeController", Domain::Bool, true));
            props.push(PropertySpec::new("controllerSize", Domain::VEC2, [400, 150]));
            props.push(PropertySpec::new("rescaleColorMap", Domain::Bool, false));
            props
        }
    };
    NodeSchema::new(ty.as_str(), props)
}
