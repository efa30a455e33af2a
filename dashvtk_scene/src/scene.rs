use dashvtk_ids::NodeID;
use dashvtk_nodes::{NodeType, PropertyIssue};
use dashvtk_variant::Variant;
use log::debug;

use crate::builder::{BuildOptions, NodeBuilder};
use crate::error::SceneError;
use crate::node::SceneNode;
use crate::share::SharedDataSets;

#[derive(Debug)]
struct IndexEntry {
    path: String,
    /// Child positions leading from the root to the node.
    route: Vec<usize>,
}

/// What the client does after a Reader finishes loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLoadAction {
    pub node: NodeID,
    pub path: String,
    pub vtk_class: String,
    pub render: bool,
    pub reset_camera: bool,
}

/// A validated tree rooted at a View, with node ids and resolved shares.
#[derive(Debug)]
pub struct Scene {
    root: SceneNode,
    index: Vec<IndexEntry>,
    shared: SharedDataSets,
}

impl Scene {
    pub fn new(root: SceneNode) -> Result<Self, SceneError> {
        if root.ty() != NodeType::View {
            return Err(SceneError::RootNotView(root.ty()));
        }

        let mut index = Vec::with_capacity(root.count());
        collect(&root, root.ty().as_str().to_string(), Vec::new(), &mut index);

        let nodes: Vec<(NodeID, &SceneNode, &str)> = index
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                lookup(&root, &entry.route)
                    .map(|node| (NodeID::from_slot(slot), node, entry.path.as_str()))
            })
            .collect();
        let shared = SharedDataSets::resolve(nodes)?;
        debug!(
            "scene ready: {} nodes, {} shared data sets",
            index.len(),
            shared.declarations().len()
        );

        Ok(Self {
            root,
            index,
            shared,
        })
    }

    /// Builds `builder` and wraps it as a scene.
    pub fn build(builder: &NodeBuilder, options: &BuildOptions) -> Result<Self, SceneError> {
        Scene::new(builder.build_with(options)?)
    }

    #[inline]
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn shared(&self) -> &SharedDataSets {
        &self.shared
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeID> + '_ {
        (0..self.index.len()).map(NodeID::from_slot)
    }

    pub fn node(&self, id: NodeID) -> Option<&SceneNode> {
        let entry = self.index.get(id.slot()?)?;
        lookup(&self.root, &entry.route)
    }

    fn node_mut(&mut self, id: NodeID) -> Option<&mut SceneNode> {
        let entry = self.index.get(id.slot()?)?;
        let mut node = &mut self.root;
        for &i in &entry.route {
            node = node.children_mut().get_mut(i)?;
        }
        Some(node)
    }

    pub fn path(&self, id: NodeID) -> Option<&str> {
        Some(self.index.get(id.slot()?)?.path.as_str())
    }

    /// Node whose `id` property equals `dom_id`.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeID> {
        self.ids()
            .find(|id| self.node(*id).and_then(SceneNode::id) == Some(dom_id))
    }

    /// First DataArray named `name`, in document order.
    pub fn find_data_array(&self, name: &str) -> Option<NodeID> {
        self.ids().find(|id| {
            self.node(*id).is_some_and(|n| {
                n.ty() == NodeType::DataArray && n.get_str("name") == Some(name)
            })
        })
    }

    /// Sets a trigger property. Returns whether the value changed,
    /// which is when the client has to act on it.
    pub fn set_trigger(
        &mut self,
        id: NodeID,
        name: &str,
        value: impl Into<Variant>,
    ) -> Result<bool, SceneError> {
        let node = self.node_mut(id).ok_or(SceneError::NoSuchNode(id))?;
        let tag = node.ty().as_str();
        let spec = node
            .schema()
            .get(name)
            .ok_or_else(|| SceneError::property(tag, name, PropertyIssue::Unknown))?;
        if !spec.is_trigger() {
            return Err(SceneError::property(tag, name, PropertyIssue::NotATrigger));
        }
        let value = spec
            .accept(value.into())
            .map_err(|issue| SceneError::property(tag, name, issue))?;
        if node.get(name).is_some_and(|current| same_value(current, &value)) {
            return Ok(false);
        }
        debug!("{tag}.{name} -> {value}");
        node.set(name, value);
        Ok(true)
    }

    pub fn post_load_actions(&self) -> Vec<PostLoadAction> {
        self.ids()
            .filter_map(|id| {
                let node = self.node(id)?;
                if node.ty() != NodeType::Reader {
                    return None;
                }
                Some(PostLoadAction {
                    node: id,
                    path: self.path(id)?.to_string(),
                    vtk_class: node.get_str("vtkClass").unwrap_or_default().to_string(),
                    render: node.get_bool("renderOnUpdate").unwrap_or(true),
                    reset_camera: node.get_bool("resetCameraOnUpdate").unwrap_or(true),
                })
            })
            .collect()
    }
}

/// Numbers compare by value, so `5` and `5.0` are the same timestamp.
fn same_value(a: &Variant, b: &Variant) -> bool {
    match (a.as_f64_lossy(), b.as_f64_lossy()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn collect(node: &SceneNode, path: String, route: Vec<usize>, out: &mut Vec<IndexEntry>) {
    out.push(IndexEntry {
        path: path.clone(),
        route: route.clone(),
    });
    for (i, child) in node.children().iter().enumerate() {
        let mut child_route = route.clone();
        child_route.push(i);
        collect(child, format!("{path}/{}[{i}]", child.ty()), child_route, out);
    }
}

fn lookup<'a>(root: &'a SceneNode, route: &[usize]) -> Option<&'a SceneNode> {
    route
        .iter()
        .try_fold(root, |node, &i| node.children().get(i))
}
