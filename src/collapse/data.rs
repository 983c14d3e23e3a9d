//! One collapse group.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// Identifier of a group inside one `CollapseTreeModel`. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A master node, the members hidden directly behind it, and links to the
/// nested groups whose masters are among those members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseData {
    id: GroupId,
    master: NodeId,
    /// Never contains `master`.
    members: HashSet<NodeId>,
    children: Vec<GroupId>,
    parent: Option<GroupId>,
}

impl CollapseData {
    pub(crate) fn new(id: GroupId, master: NodeId, parent: Option<GroupId>) -> Self {
        Self {
            id,
            master,
            members: HashSet::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn master(&self) -> NodeId {
        self.master
    }

    /// Nodes collapsed directly into this group.
    pub fn members(&self) -> &HashSet<NodeId> {
        &self.members
    }

    /// Nested groups, in the order they were folded in.
    pub fn children(&self) -> &[GroupId] {
        &self.children
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    // ========================================================================
    // Mutation (tree model only)
    // ========================================================================

    pub(crate) fn insert_member(&mut self, node: NodeId) -> bool {
        node != self.master && self.members.insert(node)
    }

    pub(crate) fn push_child(&mut self, child: GroupId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: GroupId) {
        self.children.retain(|c| *c != child);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<GroupId>) {
        self.parent = parent;
    }
}
