use std::collections::HashMap;

use dashvtk_ids::{DataSetKey, NodeID};
use log::debug;

use crate::error::SceneError;
use crate::node::SceneNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDeclaration {
    pub name: String,
    pub key: DataSetKey,
    pub node: NodeID,
}

/// A reference resolved to the node that declares its data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareReference {
    pub name: String,
    pub key: DataSetKey,
    pub node: NodeID,
    pub target: NodeID,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedDataSets {
    declarations: Vec<ShareDeclaration>,
    references: Vec<ShareReference>,
}

impl SharedDataSets {
    /// Resolves every reference against the declarations in `nodes`,
    /// given in pre-order with their paths.
    pub(crate) fn resolve<'a>(
        nodes: impl IntoIterator<Item = (NodeID, &'a SceneNode, &'a str)>,
    ) -> Result<Self, SceneError> {
        let mut declared: HashMap<&str, Vec<(NodeID, &str)>> = HashMap::new();
        let mut pending: Vec<(NodeID, &str, &str)> = Vec::new();

        for (id, node, path) in nodes {
            let name = node.get_str("name").unwrap_or_default();
            if node.is_share_declaration() {
                declared.entry(name).or_default().push((id, path));
            } else if node.is_share_reference() {
                pending.push((id, name, path));
            }
        }

        let mut shared = SharedDataSets::default();
        let mut names: Vec<&str> = declared.keys().copied().collect();
        names.sort_unstable();
        for name in names {
            let sites = &declared[name];
            if sites.len() > 1 {
                let err = SceneError::AmbiguousReference {
                    name: name.to_string(),
                    count: sites.len(),
                };
                return Err(err.within(sites[1].1));
            }
            let (node, _) = sites[0];
            shared.declarations.push(ShareDeclaration {
                name: name.to_string(),
                key: DataSetKey::from_name(name),
                node,
            });
        }
        shared.declarations.sort_by_key(|d| d.node);

        for (node, name, path) in pending {
            let target = shared
                .declaration(name)
                .map(|d| d.node)
                .ok_or_else(|| SceneError::UnresolvedReference(name.to_string()).within(path))?;
            debug!("ShareDataSet `{name}` at {path} resolves to {target}");
            shared.references.push(ShareReference {
                name: name.to_string(),
                key: DataSetKey::from_name(name),
                node,
                target,
            });
        }

        Ok(shared)
    }

    pub fn declarations(&self) -> &[ShareDeclaration] {
        &self.declarations
    }

    pub fn references(&self) -> &[ShareReference] {
        &self.references
    }

    pub fn declaration(&self, name: &str) -> Option<&ShareDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn reference_at(&self, node: NodeID) -> Option<&ShareReference> {
        self.references.iter().find(|r| r.node == node)
    }

    /// Node that holds the data a reference stands for.
    pub fn target_of(&self, node: NodeID) -> Option<NodeID> {
        self.reference_at(node).map(|r| r.target)
    }
}
