use dashvtk_variant::Variant;
use serde_json::{Map, Value as JsonValue, json};

use crate::builder::NodeBuilder;
use crate::error::LoadError;
use crate::node::SceneNode;
use crate::scene::Scene;

pub const DEFAULT_NAMESPACE: &str = "dash_vtk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    pub namespace: String,
    /// Write defaulted properties as well as explicit ones.
    pub include_defaults: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            include_defaults: true,
        }
    }
}

impl SceneNode {
    /// Dash component JSON: `{namespace, type, props: {..., children}}`.
    pub fn to_dash_json(&self, options: &SerializeOptions) -> JsonValue {
        let schema = self.schema();
        let mut props = Map::new();
        for (name, prop) in self.props() {
            if prop.value.is_null() || (!options.include_defaults && !prop.explicit) {
                continue;
            }
            if schema.get(name).is_some_and(|s| s.is_read_only()) {
                continue;
            }
            props.insert(name.to_string(), prop.value.to_json_value());
        }
        if !self.children().is_empty() {
            let children = self
                .children()
                .iter()
                .map(|c| c.to_dash_json(options))
                .collect();
            props.insert("children".to_string(), JsonValue::Array(children));
        }

        json!({
            "namespace": options.namespace,
            "type": self.ty().as_str(),
            "props": JsonValue::Object(props),
        })
    }
}

impl Scene {
    /// Layout plus an index of the shared data sets it declares and uses.
    pub fn to_json(&self, options: &SerializeOptions) -> JsonValue {
        let shared: Vec<JsonValue> = self
            .shared()
            .declarations()
            .iter()
            .map(|d| {
                let users: Vec<u32> = self
                    .shared()
                    .references()
                    .iter()
                    .filter(|r| r.target == d.node)
                    .map(|r| r.node.index())
                    .collect();
                json!({
                    "name": d.name,
                    "key": d.key.to_hex(),
                    "node": d.node.index(),
                    "references": users,
                })
            })
            .collect();

        json!({
            "layout": self.root().to_dash_json(options),
            "sharedDataSets": shared,
        })
    }
}

fn shape_error(path: &str, message: impl Into<String>) -> LoadError {
    LoadError::Shape {
        path: path.to_string(),
        message: message.into(),
    }
}

impl NodeBuilder {
    /// Reads Dash component JSON back into a builder. A `{"layout": ...}`
    /// wrapper as written by [`Scene::to_json`] is accepted too.
    pub fn from_dash_json(value: &JsonValue) -> Result<NodeBuilder, LoadError> {
        match value.get("layout") {
            Some(layout) => component(layout, "layout"),
            None => component(value, "$"),
        }
    }
}

fn component(value: &JsonValue, path: &str) -> Result<NodeBuilder, LoadError> {
    let obj = value
        .as_object()
        .ok_or_else(|| shape_error(path, "component must be an object"))?;
    let tag = obj
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| shape_error(path, "missing string `type`"))?;
    let mut node = NodeBuilder::from_tag(tag).map_err(|e| LoadError::Scene(e.within(path)))?;

    let props = match obj.get("props") {
        None | Some(JsonValue::Null) => return Ok(node),
        Some(JsonValue::Object(props)) => props,
        Some(_) => return Err(shape_error(path, "`props` must be an object")),
    };

    for (name, value) in props {
        if name != "children" {
            node.set_prop(name.clone(), Variant::from_json_value(value.clone()));
        }
    }

    match props.get("children") {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                node.push_child(component(child, &format!("{path}/children[{i}]"))?);
            }
        }
        Some(single @ JsonValue::Object(_)) => {
            node.push_child(component(single, &format!("{path}/children"))?);
        }
        Some(_) => return Err(shape_error(path, "`children` must be a list of components")),
    }

    Ok(node)
}
