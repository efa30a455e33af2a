use std::collections::HashMap;

use dashvtk_nodes::{NodeType, PropertyIssue, TypedArrayKind};
use log::warn;

use crate::cells::{CellIssue, CellKind, Connectivity, count_cells};
use crate::error::SceneError;
use crate::node::SceneNode;

/// Registration that only adds an array without giving it a role.
pub const PLAIN_REGISTRATION: &str = "addArray";

pub const SCALARS_REGISTRATION: &str = "setScalars";

/// Point and cell counts of a data set with explicit geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSetShape {
    pub points: usize,
    pub cells: usize,
}

/// Type-specific checks run once a node and its children are built.
pub(crate) fn validate(node: &SceneNode) -> Result<(), SceneError> {
    match node.ty() {
        NodeType::DataArray => check_data_array(node),
        NodeType::PointData | NodeType::CellData | NodeType::FieldData => {
            check_registrations(node)
        }
        ty if ty.is_data_set() => check_tuples(node, data_set_shape(node)?),
        NodeType::VolumeRepresentation => {
            warn_missing_volume_scalars(node);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn array_name(node: &SceneNode) -> &str {
    node.get_str("name").unwrap_or_default()
}

fn components(node: &SceneNode) -> usize {
    node.get("numberOfComponents")
        .and_then(|v| v.as_integral())
        .map_or(1, |n| n.max(1) as usize)
}

/// Number of tuples held by a DataArray.
pub fn tuple_count(node: &SceneNode) -> usize {
    let values = node.get("values").and_then(|v| v.as_array()).map_or(0, |a| a.len());
    values / components(node)
}

fn check_data_array(node: &SceneNode) -> Result<(), SceneError> {
    let values = node.get_numbers("values").unwrap_or_default();
    let comps = components(node);
    if values.len() % comps != 0 {
        return Err(SceneError::length(
            format!("DataArray `{}`", array_name(node)),
            format!(
                "{} values is not a multiple of numberOfComponents {comps}",
                values.len()
            ),
        ));
    }

    if let Some(kind) = node.get_str("type").and_then(TypedArrayKind::from_name) {
        kind.check_values(&values)
            .map_err(|issue| SceneError::property("DataArray", "values", issue))?;
    }
    Ok(())
}

/// Every role other than `addArray` may be held by one array per container.
fn check_registrations(container: &SceneNode) -> Result<(), SceneError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (i, array) in container.children().iter().enumerate() {
        let registration = array.get_str("registration").unwrap_or(PLAIN_REGISTRATION);
        if registration == PLAIN_REGISTRATION {
            continue;
        }
        let name = array_name(array);
        if let Some(first) = seen.insert(registration, name) {
            return Err(SceneError::DuplicateRegistration {
                container: container.ty(),
                registration: registration.to_string(),
                first: first.to_string(),
                second: name.to_string(),
            }
            .within(&format!("DataArray[{i}]")));
        }
    }
    Ok(())
}

fn cell_error(kind: CellKind, issue: CellIssue) -> SceneError {
    match issue {
        CellIssue::Overrun { .. } => {
            SceneError::length(format!("PolyData.{}", kind.prop_name()), issue.to_string())
        }
        other => SceneError::property(
            "PolyData",
            kind.prop_name(),
            PropertyIssue::OutOfDomain(other.to_string()),
        ),
    }
}

/// Point and cell counts of an ImageData or PolyData node.
pub fn shape(node: &SceneNode) -> Option<DataSetShape> {
    if !node.ty().is_data_set() {
        return None;
    }
    data_set_shape(node).ok()
}

fn data_set_shape(node: &SceneNode) -> Result<DataSetShape, SceneError> {
    match node.ty() {
        NodeType::ImageData => image_shape(node),
        _ => poly_shape(node),
    }
}

fn image_shape(node: &SceneNode) -> Result<DataSetShape, SceneError> {
    let dims = node.get_integers("dimensions").unwrap_or_else(|| vec![1, 1, 1]);
    let too_large = || {
        SceneError::property(
            "ImageData",
            "dimensions",
            PropertyIssue::OutOfDomain("dimensions overflow the point count".into()),
        )
    };
    let mut points: usize = 1;
    let mut cells: usize = 1;
    for d in dims {
        let d = d.max(1) as usize;
        points = points.checked_mul(d).ok_or_else(too_large)?;
        cells = cells.checked_mul((d - 1).max(1)).ok_or_else(too_large)?;
    }
    Ok(DataSetShape { points, cells })
}

fn poly_shape(node: &SceneNode) -> Result<DataSetShape, SceneError> {
    let coords = node.get("points").and_then(|v| v.as_array()).map_or(0, |a| a.len());
    if coords % 3 != 0 {
        return Err(SceneError::length(
            "PolyData.points",
            format!("{coords} coordinates is not a multiple of 3"),
        ));
    }
    let points = coords / 3;

    let connectivity: Connectivity = node
        .get_str("connectivity")
        .unwrap_or("manual")
        .parse()
        .map_err(|e: String| {
            SceneError::property("PolyData", "connectivity", PropertyIssue::OutOfDomain(e))
        })?;
    let generated = connectivity.generate(points).map_err(|n| {
        SceneError::length(
            "PolyData.points",
            format!("triangles connectivity needs a multiple of 3 points, found {n}"),
        )
    })?;

    let mut cells = 0;
    for kind in CellKind::ALL {
        let values = if connectivity.generates() == Some(kind) {
            generated.clone()
        } else {
            node.get_integers(kind.prop_name()).unwrap_or_default()
        };
        cells += count_cells(kind, &values, points).map_err(|issue| cell_error(kind, issue))?;
    }
    Ok(DataSetShape { points, cells })
}

/// Tuple counts of PointData and CellData arrays must match the geometry.
fn check_tuples(data_set: &SceneNode, shape: DataSetShape) -> Result<(), SceneError> {
    for (i, container) in data_set.children().iter().enumerate() {
        let expected = match container.ty() {
            NodeType::PointData => shape.points,
            NodeType::CellData => shape.cells,
            _ => continue,
        };
        for (j, array) in container.children().iter().enumerate() {
            let tuples = tuple_count(array);
            if tuples != expected {
                let unit = if container.ty() == NodeType::PointData {
                    "points"
                } else {
                    "cells"
                };
                return Err(SceneError::length(
                    format!("{}.{}", container.ty(), array_name(array)),
                    format!("{tuples} tuples for {expected} {unit}"),
                )
                .within(&format!("DataArray[{j}]"))
                .within(&format!("{}[{i}]", container.ty())));
            }
        }
    }
    Ok(())
}

fn has_point_scalars(image: &SceneNode) -> bool {
    image
        .children()
        .iter()
        .filter(|c| c.ty() == NodeType::PointData)
        .flat_map(|c| c.children())
        .any(|a| a.get_str("registration") == Some(SCALARS_REGISTRATION))
}

fn warn_missing_volume_scalars(volume: &SceneNode) {
    for image in volume.children().iter().filter(|c| c.ty() == NodeType::ImageData) {
        if !has_point_scalars(image) {
            warn!("VolumeRepresentation: ImageData has no setScalars point array to render");
        }
    }
}
