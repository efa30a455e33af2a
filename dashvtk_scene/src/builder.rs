use dashvtk_nodes::{ComponentTag, HelperType, NodeType, node_schema};
use dashvtk_variant::Variant;
use indexmap::IndexMap;
use log::debug;

use crate::error::SceneError;
use crate::node::SceneNode;
use crate::{fields, helpers, props};

/// What to do with property names a schema does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPropertyPolicy {
    #[default]
    Reject,
    /// Keep them verbatim and forward them to the client.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub unknown_properties: UnknownPropertyPolicy,
}

impl BuildOptions {
    pub fn passthrough() -> Self {
        Self {
            unknown_properties: UnknownPropertyPolicy::Passthrough,
        }
    }
}

/// Unvalidated description of a node: tag, overrides and children.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBuilder {
    tag: ComponentTag,
    props: IndexMap<String, Variant>,
    children: Vec<NodeBuilder>,
}

impl NodeBuilder {
    pub fn new(tag: impl Into<ComponentTag>) -> Self {
        Self {
            tag: tag.into(),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, SceneError> {
        tag.parse::<ComponentTag>()
            .map(NodeBuilder::new)
            .map_err(|e| SceneError::UnknownType(e.0))
    }

    #[inline]
    pub fn tag(&self) -> ComponentTag {
        self.tag
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Variant>) -> Self {
        self.set_prop(name, value);
        self
    }

    pub fn set_prop(&mut self, name: impl Into<String>, value: impl Into<Variant>) {
        self.props.insert(name.into(), value.into());
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn props(&self) -> &IndexMap<String, Variant> {
        &self.props
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push_child(&mut self, child: NodeBuilder) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[NodeBuilder] {
        &self.children
    }

    /// Node type this builder produces once helpers are expanded.
    pub fn node_type(&self) -> NodeType {
        match self.tag {
            ComponentTag::Node(ty) => ty,
            ComponentTag::Helper(h) => h.expands_to(),
        }
    }

    /// Builds with strict property checking.
    pub fn build(&self) -> Result<SceneNode, SceneError> {
        self.build_with(&BuildOptions::default())
    }

    pub fn build_with(&self, options: &BuildOptions) -> Result<SceneNode, SceneError> {
        self.build_node(options)
            .map_err(|e| e.within(self.tag.as_str()))
    }

    pub(crate) fn build_node(&self, options: &BuildOptions) -> Result<SceneNode, SceneError> {
        let ty = match self.tag {
            ComponentTag::Node(ty) => ty,
            ComponentTag::Helper(helper) => return self.build_helper(helper, options),
        };

        let props = props::apply(node_schema(ty), &self.props, options)?;

        let mut children = Vec::with_capacity(self.children.len());
        for (i, child) in self.children.iter().enumerate() {
            let segment = format!("{}[{i}]", child.tag.as_str());
            let child_ty = child.node_type();
            if !ty.allows_child(child_ty) {
                return Err(SceneError::InvalidParentChild {
                    parent: ty,
                    child: child_ty,
                }
                .within(&segment));
            }
            children.push(child.build_node(options).map_err(|e| e.within(&segment))?);
        }
        if let Some(max) = ty.max_children() {
            if children.len() > max {
                return Err(SceneError::ChildLimit {
                    parent: ty,
                    max,
                    found: children.len(),
                });
            }
        }

        let node = SceneNode::new(ty, props, children);
        fields::validate(&node)?;
        debug!(
            "built {ty} ({} props, {} children)",
            node.props().count(),
            node.children().len()
        );
        Ok(node)
    }

    fn build_helper(
        &self,
        helper: HelperType,
        options: &BuildOptions,
    ) -> Result<SceneNode, SceneError> {
        if !self.children.is_empty() {
            return Err(SceneError::ChildLimit {
                parent: helper.expands_to(),
                max: 0,
                found: self.children.len(),
            });
        }
        let expanded = helpers::expand(helper, &self.props, options)?;
        debug!("expanded {helper} into {}", expanded.tag.as_str());
        expanded.build_node(options)
    }
}

impl From<NodeType> for NodeBuilder {
    fn from(ty: NodeType) -> Self {
        NodeBuilder::new(ty)
    }
}
