use dashvtk_nodes::{NodeSchema, PropertyIssue};
use dashvtk_variant::Variant;
use indexmap::IndexMap;
use log::warn;

use crate::builder::{BuildOptions, UnknownPropertyPolicy};
use crate::error::SceneError;
use crate::node::Property;

/// Fills a complete property table from user overrides and schema defaults.
pub(crate) fn apply(
    schema: &'static NodeSchema,
    given: &IndexMap<String, Variant>,
    options: &BuildOptions,
) -> Result<IndexMap<String, Property>, SceneError> {
    let node = schema.tag;

    if options.unknown_properties == UnknownPropertyPolicy::Reject {
        if let Some(name) = given.keys().find(|k| schema.get(k).is_none()) {
            return Err(SceneError::property(node, name.as_str(), PropertyIssue::Unknown));
        }
    }

    let mut out = IndexMap::with_capacity(schema.properties().len());
    for spec in schema.properties() {
        let prop = match given.get(spec.name) {
            Some(value) => Property {
                value: spec
                    .accept(value.clone())
                    .map_err(|issue| SceneError::property(node, spec.name, issue))?,
                explicit: true,
            },
            None if spec.required => {
                return Err(SceneError::property(node, spec.name, PropertyIssue::Missing));
            }
            None => Property {
                value: spec.default.clone(),
                explicit: false,
            },
        };
        out.insert(spec.name.to_string(), prop);
    }

    for group in schema.groups() {
        let mut set = schema
            .group_members(group)
            .filter(|p| out.get(p.name).is_some_and(|v| !v.value.is_null()));
        if let (Some(first), Some(second)) = (set.next(), set.next()) {
            return Err(SceneError::MutuallyExclusive {
                node,
                group,
                first: first.name,
                second: second.name,
            });
        }
    }

    for (name, value) in given {
        if schema.get(name).is_none() {
            warn!("{node}: keeping unknown property `{name}`");
            out.insert(
                name.clone(),
                Property {
                    value: value.clone(),
                    explicit: true,
                },
            );
        }
    }

    Ok(out)
}
