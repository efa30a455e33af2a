use std::collections::BTreeMap;
use std::sync::Arc;

use dashvtk_nodes::defaults::FIELD_LOCATIONS;
use dashvtk_nodes::{HelperType, NodeType, PropertyIssue, helper_schema};
use dashvtk_variant::Variant;
use indexmap::IndexMap;

use crate::builder::{BuildOptions, NodeBuilder};
use crate::error::SceneError;
use crate::node::Property;
use crate::props;

type Section = BTreeMap<Arc<str>, Variant>;

/// Rewrites a helper component into the primitive subtree it stands for.
pub(crate) fn expand(
    helper: HelperType,
    given: &IndexMap<String, Variant>,
    options: &BuildOptions,
) -> Result<NodeBuilder, SceneError> {
    let schema = helper_schema(helper);
    let props = props::apply(schema, given, options)?;
    let tag = helper.as_str();

    let mut root = match helper {
        HelperType::Mesh => mesh(tag, &props)?,
        HelperType::Volume => volume(tag, &props)?,
        HelperType::PointCloudRepresentation => point_cloud(&props),
        HelperType::VolumeDataRepresentation => volume_data(tag, &props)?,
    };

    copy_if_set(&props, &mut root, "id", "id");
    for (name, prop) in &props {
        if schema.get(name).is_none() {
            root.set_prop(name.clone(), prop.value.clone());
        }
    }
    Ok(root)
}

fn value<'a>(props: &'a IndexMap<String, Property>, name: &str) -> Option<&'a Variant> {
    props.get(name).map(|p| &p.value).filter(|v| !v.is_null())
}

fn copy_if_set(props: &IndexMap<String, Property>, to: &mut NodeBuilder, from: &str, name: &str) {
    if let Some(v) = value(props, from) {
        to.set_prop(name, v.clone());
    }
}

/// Copies a prop that was given explicitly, leaving schema defaults to the target node.
fn copy_explicit(props: &IndexMap<String, Property>, to: &mut NodeBuilder, name: &str) {
    if props.get(name).is_some_and(|p| p.explicit) {
        copy_if_set(props, to, name, name);
    }
}

fn section<'a>(
    tag: &'static str,
    state: &'a Variant,
    key: &str,
) -> Result<Option<&'a Section>, SceneError> {
    match state.get(key) {
        None | Some(Variant::Null) => Ok(None),
        Some(Variant::Object(map)) => Ok(Some(map)),
        Some(other) => Err(SceneError::property(
            tag,
            format!("state.{key}"),
            PropertyIssue::TypeMismatch {
                expected: "object",
                found: other.kind(),
            },
        )),
    }
}

fn with_section(ty: NodeType, section: &Section) -> NodeBuilder {
    let mut node = NodeBuilder::new(ty);
    for (k, v) in section {
        node.set_prop(k.as_ref(), v.clone());
    }
    node
}

/// DataArray from a `field` section; `location` picks the container.
fn field_array(tag: &'static str, field: &Section) -> Result<(NodeType, NodeBuilder), SceneError> {
    let mut array = NodeBuilder::new(NodeType::DataArray);
    let mut container = NodeType::PointData;
    for (k, v) in field {
        if k.as_ref() == "location" {
            container = match v
                .as_str()
                .filter(|l| FIELD_LOCATIONS.contains(l))
                .and_then(NodeType::from_tag)
            {
                Some(ty) => ty,
                None => {
                    return Err(SceneError::property(
                        tag,
                        "state.field.location",
                        PropertyIssue::OutOfDomain(format!(
                            "`{v}` is not one of: {}",
                            FIELD_LOCATIONS.join(", ")
                        )),
                    ));
                }
            };
        } else {
            array.set_prop(k.as_ref(), v.clone());
        }
    }
    if !array.has_prop("registration") {
        array.set_prop("registration", "setScalars");
    }
    Ok((container, array))
}

fn state<'a>(tag: &'static str, props: &'a IndexMap<String, Property>) -> Result<&'a Variant, SceneError> {
    value(props, "state").ok_or_else(|| SceneError::property(tag, "state", PropertyIssue::Missing))
}

fn mesh(tag: &'static str, props: &IndexMap<String, Property>) -> Result<NodeBuilder, SceneError> {
    let state = state(tag, props)?;
    let mesh = section(tag, state, "mesh")?
        .ok_or_else(|| SceneError::property(tag, "state.mesh", PropertyIssue::Missing))?;
    let mut poly = with_section(NodeType::PolyData, mesh);
    copy_explicit(props, &mut poly, "port");
    if let Some(field) = section(tag, state, "field")? {
        let (container, array) = field_array(tag, field)?;
        poly.push_child(NodeBuilder::new(container).child(array));
    }
    Ok(poly)
}

fn volume(tag: &'static str, props: &IndexMap<String, Property>) -> Result<NodeBuilder, SceneError> {
    let state = state(tag, props)?;
    let image = section(tag, state, "image")?
        .ok_or_else(|| SceneError::property(tag, "state.image", PropertyIssue::Missing))?;
    let mut data = with_section(NodeType::ImageData, image);
    copy_explicit(props, &mut data, "port");
    if let Some(field) = section(tag, state, "field")? {
        let (container, array) = field_array(tag, field)?;
        data.push_child(NodeBuilder::new(container).child(array));
    }
    Ok(data)
}

/// `rgb`, `rgba` or `scalars` as a point-data array, whichever was given.
fn color_field(props: &IndexMap<String, Property>, scalars_type: &str) -> Option<NodeBuilder> {
    let (name, values, comps, ty) = if let Some(v) = value(props, "rgb") {
        ("rgb", v, 3, "Uint8Array")
    } else if let Some(v) = value(props, "rgba") {
        ("rgba", v, 4, "Uint8Array")
    } else {
        ("scalars", value(props, "scalars")?, 1, scalars_type)
    };
    Some(
        NodeBuilder::new(NodeType::DataArray)
            .prop("name", name)
            .prop("registration", "setScalars")
            .prop("values", values.clone())
            .prop("numberOfComponents", comps)
            .prop("type", ty),
    )
}

fn point_cloud(props: &IndexMap<String, Property>) -> NodeBuilder {
    let mut rep = NodeBuilder::new(NodeType::GeometryRepresentation);
    copy_explicit(props, &mut rep, "colorMapPreset");
    copy_explicit(props, &mut rep, "colorDataRange");
    copy_if_set(props, &mut rep, "property", "property");

    let mut poly = NodeBuilder::new(NodeType::PolyData).prop("connectivity", "points");
    copy_if_set(props, &mut poly, "xyz", "points");
    if let Some(array) = color_field(props, "Float32Array") {
        poly.push_child(NodeBuilder::new(NodeType::PointData).child(array));
    }
    rep.child(poly)
}

fn volume_data(
    tag: &'static str,
    props: &IndexMap<String, Property>,
) -> Result<NodeBuilder, SceneError> {
    let mut rep = NodeBuilder::new(NodeType::VolumeRepresentation);
    copy_explicit(props, &mut rep, "colorMapPreset");
    copy_explicit(props, &mut rep, "colorDataRange");
    for name in ["mapper", "volume", "property"] {
        copy_if_set(props, &mut rep, name, name);
    }

    if value(props, "volumeController").and_then(Variant::as_bool) == Some(true) {
        let mut controller = NodeBuilder::new(NodeType::VolumeController);
        copy_if_set(props, &mut controller, "controllerSize", "size");
        copy_if_set(props, &mut controller, "rescaleColorMap", "rescaleColorMap");
        rep.push_child(controller);
    }

    let mut image = NodeBuilder::new(NodeType::ImageData);
    for name in ["dimensions", "spacing", "origin"] {
        copy_if_set(props, &mut image, name, name);
    }
    let scalars_type = value(props, "scalarsType")
        .and_then(Variant::as_str)
        .unwrap_or("Float32Array");
    let array = color_field(props, scalars_type)
        .ok_or_else(|| SceneError::property(tag, "scalars", PropertyIssue::Missing))?;
    image.push_child(NodeBuilder::new(NodeType::PointData).child(array));

    Ok(rep.child(image))
}
