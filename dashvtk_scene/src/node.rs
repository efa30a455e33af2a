use dashvtk_nodes::{NodeSchema, NodeType, node_schema};
use dashvtk_variant::Variant;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub value: Variant,
    /// Set by the user rather than filled from the schema default.
    pub explicit: bool,
}

/// A validated node: every schema property present, children checked.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    ty: NodeType,
    props: IndexMap<String, Property>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub(crate) fn new(
        ty: NodeType,
        props: IndexMap<String, Property>,
        children: Vec<SceneNode>,
    ) -> Self {
        Self {
            ty,
            props,
            children,
        }
    }

    #[inline]
    pub fn ty(&self) -> NodeType {
        self.ty
    }

    #[inline]
    pub fn schema(&self) -> &'static NodeSchema {
        node_schema(self.ty)
    }

    #[inline]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// Properties in schema order, passthrough properties last.
    pub fn props(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.props.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.props.get(name).map(|p| &p.value)
    }

    pub(crate) fn set(&mut self, name: &str, value: Variant) {
        if let Some(prop) = self.props.get_mut(name) {
            prop.value = value;
            prop.explicit = true;
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Variant::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Variant::as_bool)
    }

    pub fn get_numbers(&self, name: &str) -> Option<Vec<f64>> {
        self.get(name).and_then(Variant::numbers)
    }

    pub fn get_integers(&self, name: &str) -> Option<Vec<i64>> {
        self.get(name).and_then(Variant::integers)
    }

    pub fn is_explicit(&self, name: &str) -> bool {
        self.props.get(name).is_some_and(|p| p.explicit)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    /// ShareDataSet declarations wrap a source; references are empty.
    pub fn is_share_declaration(&self) -> bool {
        self.ty == NodeType::ShareDataSet && !self.children.is_empty()
    }

    pub fn is_share_reference(&self) -> bool {
        self.ty == NodeType::ShareDataSet && self.children.is_empty()
    }

    /// Pre-order walk over this node and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&SceneNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}
