//! The collapse orchestrator.
//!
//! A `Collapser` owns one `CollapseTreeModel` and shares the authoritative
//! `GraphModel`. Every call is either a **mutation** of the tree model
//! (`collapse`, `uncollapse`, `collapse_tree`) or a **projection** of the
//! graph through it (`build_exposed_graph`). Projections are never cached.
//!
//! ## Limitations
//!
//! - **Single owner**: no internal locking. Drive one `Collapser` from one
//!   thread; share the `GraphModel` between collapsers instead.
//! - **Exposed members only**: `collapse()` rejects members that are already
//!   hidden inside some group. Pick the visible master instead.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::config::CollapserConfig;
use crate::hierarchy::HierarchicalTreeModel;
use crate::model::{GraphModel, NodeId};
use crate::{Error, Result};
use super::{CollapseData, CollapseTreeModel, GroupId};

// ============================================================================
// Collapser
// ============================================================================

#[derive(Debug, Clone)]
pub struct Collapser {
    graph: Arc<GraphModel>,
    tree: CollapseTreeModel,
    config: CollapserConfig,
}

impl Collapser {
    pub fn new(graph: Arc<GraphModel>) -> Self {
        Self::with_config(graph, CollapserConfig::default())
    }

    pub fn with_config(graph: Arc<GraphModel>, config: CollapserConfig) -> Self {
        Self {
            graph,
            tree: CollapseTreeModel::new(),
            config,
        }
    }

    pub fn graph(&self) -> &Arc<GraphModel> {
        &self.graph
    }

    pub fn tree(&self) -> &CollapseTreeModel {
        &self.tree
    }

    pub fn config(&self) -> &CollapserConfig {
        &self.config
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Hide `picked` behind `master`.
    ///
    /// `picked` is copied on entry. `master` may or may not be part of it;
    /// it is never a member of its own group. A member that already leads a
    /// top-level group brings that group along as a nested child.
    ///
    /// With `additive == false` the members fold into the group `master`
    /// already leads, if any. Otherwise a new group is created and an
    /// existing group led by `master` nests inside it. Either way, if
    /// `master` itself is hidden the group lives inside the group hiding it.
    pub fn collapse<I>(&mut self, master: NodeId, picked: I, additive: bool) -> Result<GroupId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut seen = HashSet::new();
        let picked: Vec<NodeId> = picked.into_iter().filter(|n| seen.insert(*n)).collect();
        let members = self.validate_collapse(master, &picked)?;

        let existing = self.tree.led_by(master).map(CollapseData::id);
        let target = match existing {
            Some(group) if !additive => {
                debug!(%master, %group, members = members.len(), "folding nodes into existing group");
                group
            }
            _ => {
                let parent = self.tree.owner_of(master).map(CollapseData::id);
                let group = self.tree.insert_group(master, parent);
                if let Some(previous) = existing {
                    self.tree.reparent(previous, Some(group));
                }
                debug!(%master, %group, members = members.len(), nested = parent.is_some(), "created collapse group");
                group
            }
        };

        for member in members {
            let led = self.tree.led_by(member).map(CollapseData::id);
            self.tree.add_member(target, member);
            if let Some(nested) = led {
                self.tree.reparent(nested, Some(target));
            }
        }

        Ok(target)
    }

    /// Check every contract of `collapse()` before anything changes. Returns
    /// the member list: `picked` minus `master`.
    fn validate_collapse(&self, master: NodeId, picked: &[NodeId]) -> Result<Vec<NodeId>> {
        let reject = |message: String| {
            warn!(%master, "rejected collapse: {message}");
            Err(Error::InvalidArgument(message))
        };

        if picked.is_empty() {
            return reject("cannot collapse an empty node set".into());
        }
        if !self.graph.contains_node(master) {
            return reject(format!("master node {master} is not in the graph"));
        }
        if let Some(missing) = picked.iter().find(|n| !self.graph.contains_node(**n)) {
            return reject(format!("picked node {missing} is not in the graph"));
        }

        let visible_master = self.tree.representative(master);
        let members: Vec<NodeId> = picked.iter().copied().filter(|n| *n != master).collect();
        for &member in &members {
            if let Some(owner) = self.tree.owner_of(member) {
                return reject(format!(
                    "node {member} is already collapsed under {}",
                    owner.master()
                ));
            }
            if member == visible_master {
                return reject(format!(
                    "node {member} hides master {master} and cannot become its member"
                ));
            }
        }
        Ok(members)
    }

    /// Remove the outermost group led by `master` and return it.
    ///
    /// Non-recursive removal promotes the nested groups one level, so their
    /// masters become visible while their own members stay hidden. Recursive
    /// removal dissolves the whole subtree. Returns `None` when `master`
    /// leads no group.
    pub fn uncollapse(&mut self, master: NodeId, recursive: bool) -> Option<CollapseData> {
        let group = self.tree.led_by(master)?.id();
        let removed = self.tree.remove_group(group, recursive)?;
        let promoted = if recursive { 0 } else { removed.children().len() };
        debug!(%master, %group, recursive, promoted, "removed collapse group");
        Some(removed)
    }

    /// Dissolve every group.
    pub fn uncollapse_all(&mut self) {
        debug!(groups = self.tree.len(), "removing all collapse groups");
        self.tree.clear();
    }

    /// Collapse a whole hierarchy bottom-up: every node with children
    /// becomes the master of a group holding itself and its children.
    /// Returns the groups in construction order.
    pub fn collapse_tree(&mut self, hierarchy: &HierarchicalTreeModel) -> Result<Vec<GroupId>> {
        // Validate everything up front so a bad hierarchy changes nothing.
        for &node in hierarchy.nodes() {
            if !self.graph.contains_node(node) {
                return Err(Error::InvalidArgument(format!(
                    "hierarchy node {node} is not in the graph"
                )));
            }
            let participates = hierarchy.parent(node).is_some() || !hierarchy.is_leaf(node);
            if participates && self.tree.is_hidden(node) {
                return Err(Error::InvalidArgument(format!(
                    "hierarchy node {node} is already collapsed"
                )));
            }
        }

        let additive = self.config.tree_collapse_additive;
        let mut created = Vec::new();
        for node in hierarchy.post_order() {
            let children = hierarchy.children(node);
            if children.is_empty() {
                continue;
            }
            let picked = std::iter::once(node).chain(children.iter().copied());
            created.push(self.collapse(node, picked, additive)?);
        }

        debug!(groups = created.len(), "collapsed hierarchy");
        Ok(created)
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// The node that stands in for `node` in the exposed graph.
    pub fn representative(&self, node: NodeId) -> NodeId {
        self.tree.representative(node)
    }

    pub fn is_exposed(&self, node: NodeId) -> bool {
        self.graph.contains_node(node) && !self.tree.is_hidden(node)
    }

    /// Project the graph through the current groups.
    ///
    /// Every node is replaced by its representative, edges internal to a
    /// group are dropped, and edges that land on the same
    /// `(relation, head, tail)` are merged.
    pub fn build_exposed_graph(&self) -> GraphModel {
        let reps: HashMap<NodeId, NodeId> = self
            .graph
            .nodes()
            .iter()
            .map(|node| (node.id, self.tree.representative(node.id)))
            .collect();

        let mut exposed = GraphModel::new();
        for node in self.graph.nodes() {
            if reps.get(&node.id) == Some(&node.id) {
                exposed.push_node(node.clone());
            }
        }

        let mut seen = HashSet::new();
        for edge in self.graph.edges() {
            let (Some(&head), Some(&tail)) = (reps.get(&edge.head), reps.get(&edge.tail)) else {
                continue;
            };
            if head == tail {
                continue;
            }
            if seen.insert((&edge.relation, head, tail)) {
                exposed.push_edge(edge.relation.clone(), head, tail);
            }
        }

        trace!(
            nodes = exposed.node_count(),
            edges = exposed.edge_count(),
            groups = self.tree.len(),
            "built exposed graph"
        );
        exposed
    }
}

// ============================================================================
// Tests
// ============================================================================
