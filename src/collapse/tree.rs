//! Collapse tree model — the forest of active collapse groups.
//!
//! Groups live in an arena keyed by `GroupId`. Two indexes sit beside it:
//!
//! - `owners`: hidden node → the group that lists it as a direct member
//! - `led`: master node → the groups it leads
//!
//! A master leads more than one group only when an additive collapse nests
//! its previous group under a new one with the same master.
//!
//! The `roots` and `nodes` views are cached and dropped on every structural
//! change.

use std::cell::OnceCell;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::model::NodeId;
use super::{CollapseData, GroupId};

#[derive(Debug, Clone, Default)]
pub struct CollapseTreeModel {
    groups: HashMap<GroupId, CollapseData>,
    owners: HashMap<NodeId, GroupId>,
    led: HashMap<NodeId, SmallVec<[GroupId; 1]>>,
    next_group: u64,
    roots_cache: OnceCell<Vec<GroupId>>,
    nodes_cache: OnceCell<HashSet<NodeId>>,
}

impl CollapseTreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get(&self, id: GroupId) -> Option<&CollapseData> {
        self.groups.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &CollapseData> + '_ {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group that hides `node` directly. Masters of top-level groups and
    /// uncollapsed nodes have no owner.
    pub fn owner_of(&self, node: NodeId) -> Option<&CollapseData> {
        self.owners.get(&node).and_then(|id| self.groups.get(id))
    }

    /// The outermost group led by `master`.
    pub fn led_by(&self, master: NodeId) -> Option<&CollapseData> {
        self.led
            .get(&master)?
            .iter()
            .filter_map(|id| self.groups.get(id))
            .find(|group| match group.parent().and_then(|p| self.groups.get(&p)) {
                Some(parent) => parent.master() != master,
                None => true,
            })
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.owners.contains_key(&node)
    }

    /// The node standing in for `node` once every group is applied.
    pub fn representative(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(owner) = self.owner_of(current) {
            current = owner.master();
        }
        current
    }

    /// Parentless groups, oldest first.
    pub fn compute_roots(&self) -> Vec<&CollapseData> {
        let ids = self.roots_cache.get_or_init(|| {
            let mut ids: Vec<GroupId> = self
                .groups
                .values()
                .filter(|group| group.is_root())
                .map(CollapseData::id)
                .collect();
            ids.sort_unstable();
            ids
        });
        ids.iter().filter_map(|id| self.groups.get(id)).collect()
    }

    /// Every node covered by some group, masters included.
    pub fn compute_nodes(&self) -> &HashSet<NodeId> {
        self.nodes_cache.get_or_init(|| {
            self.led
                .keys()
                .chain(self.owners.keys())
                .copied()
                .collect()
        })
    }

    pub fn master_node_set(&self) -> HashSet<NodeId> {
        self.led.keys().copied().collect()
    }

    /// Immediate child groups of `id`. A child led by the same master as
    /// `id` is left out since it would repeat the lookup key.
    pub fn build_children_data(&self, id: GroupId) -> Vec<&CollapseData> {
        let Some(group) = self.groups.get(&id) else {
            return Vec::new();
        };
        group
            .children()
            .iter()
            .filter_map(|child| self.groups.get(child))
            .filter(|child| child.master() != group.master())
            .collect()
    }

    /// Master, members and everything nested below `id`.
    pub fn covered_nodes(&self, id: GroupId) -> HashSet<NodeId> {
        let mut covered = HashSet::new();
        for gid in self.subtree(id) {
            if let Some(group) = self.groups.get(&gid) {
                covered.insert(group.master());
                covered.extend(group.members().iter().copied());
            }
        }
        covered
    }

    /// `id` and all groups nested below it, parents first.
    fn subtree(&self, id: GroupId) -> Vec<GroupId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(gid) = stack.pop() {
            let Some(group) = self.groups.get(&gid) else {
                continue;
            };
            out.push(gid);
            stack.extend(group.children().iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Mutation (Collapser only)
    // ========================================================================

    fn invalidate(&mut self) {
        self.roots_cache = OnceCell::new();
        self.nodes_cache = OnceCell::new();
    }

    /// Drop every group. The id counter keeps running so stale ids never
    /// resolve to a later group.
    pub(crate) fn clear(&mut self) {
        self.groups.clear();
        self.owners.clear();
        self.led.clear();
        self.invalidate();
    }

    pub(crate) fn insert_group(&mut self, master: NodeId, parent: Option<GroupId>) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;

        self.groups.insert(id, CollapseData::new(id, master, parent));
        if let Some(p) = parent.and_then(|p| self.groups.get_mut(&p)) {
            p.push_child(id);
        }
        self.led.entry(master).or_default().push(id);
        self.invalidate();
        id
    }

    pub(crate) fn add_member(&mut self, id: GroupId, node: NodeId) {
        let Some(group) = self.groups.get_mut(&id) else {
            return;
        };
        if group.insert_member(node) {
            self.owners.insert(node, id);
            self.invalidate();
        }
    }

    pub(crate) fn reparent(&mut self, id: GroupId, parent: Option<GroupId>) {
        let Some(old) = self.groups.get(&id).map(CollapseData::parent) else {
            return;
        };
        if let Some(old) = old.and_then(|p| self.groups.get_mut(&p)) {
            old.remove_child(id);
        }
        if let Some(new) = parent.and_then(|p| self.groups.get_mut(&p)) {
            new.push_child(id);
        }
        if let Some(group) = self.groups.get_mut(&id) {
            group.set_parent(parent);
        }
        self.invalidate();
    }

    /// Remove group `id`.
    ///
    /// Non-recursive: its members and child groups move up to its parent, or
    /// to the top level. Recursive: the whole subtree goes and every node it
    /// covered, except the master, moves up the same way.
    pub(crate) fn remove_group(&mut self, id: GroupId, recursive: bool) -> Option<CollapseData> {
        let parent = self.groups.get(&id)?.parent();
        if let Some(p) = parent.and_then(|p| self.groups.get_mut(&p)) {
            p.remove_child(id);
        }

        let removed = if recursive {
            let mut freed: Vec<NodeId> = Vec::new();
            let mut removed = None;
            for gid in self.subtree(id) {
                let Some(group) = self.unregister(gid) else {
                    continue;
                };
                freed.extend(group.members().iter().copied());
                if gid == id {
                    removed = Some(group);
                }
            }
            for node in freed {
                self.release(node, parent);
            }
            removed
        } else {
            let group = self.unregister(id)?;
            for &node in group.members() {
                self.release(node, parent);
            }
            for &child in group.children() {
                if let Some(c) = self.groups.get_mut(&child) {
                    c.set_parent(parent);
                }
                if let Some(p) = parent.and_then(|p| self.groups.get_mut(&p)) {
                    p.push_child(child);
                }
            }
            Some(group)
        };

        self.invalidate();
        removed
    }

    fn unregister(&mut self, id: GroupId) -> Option<CollapseData> {
        let group = self.groups.remove(&id)?;
        if let Some(ids) = self.led.get_mut(&group.master()) {
            ids.retain(|g| *g != id);
            if ids.is_empty() {
                self.led.remove(&group.master());
            }
        }
        Some(group)
    }

    /// Hand `node` to `parent`, or expose it when there is none.
    fn release(&mut self, node: NodeId, parent: Option<GroupId>) {
        match parent.and_then(|p| self.groups.get_mut(&p)) {
            Some(group) => {
                group.insert_member(node);
                self.owners.insert(node, group.id());
            }
            None => {
                self.owners.remove(&node);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u64) -> NodeId {
        NodeId(id)
    }

    #[test]
    fn test_roots_and_nodes_views() {
        let mut tree = CollapseTreeModel::new();
        let inner = tree.insert_group(n(3), None);
        tree.add_member(inner, n(4));
        let outer = tree.insert_group(n(2), None);
        tree.add_member(outer, n(3));
        tree.reparent(inner, Some(outer));

        let roots: Vec<GroupId> = tree.compute_roots().iter().map(|g| g.id()).collect();
        assert_eq!(roots, vec![outer]);

        let nodes = tree.compute_nodes();
        assert_eq!(nodes.len(), 3);
        assert!(nodes.contains(&n(2)) && nodes.contains(&n(3)) && nodes.contains(&n(4)));

        assert_eq!(tree.master_node_set().len(), 2);
        assert_eq!(tree.representative(n(4)), n(2));
        assert_eq!(tree.owner_of(n(4)).map(|g| g.id()), Some(inner));
        assert!(tree.owner_of(n(2)).is_none());
    }

    #[test]
    fn test_cache_invalidated_on_change() {
        let mut tree = CollapseTreeModel::new();
        let g = tree.insert_group(n(1), None);
        assert_eq!(tree.compute_nodes().len(), 1);

        tree.add_member(g, n(2));
        assert_eq!(tree.compute_nodes().len(), 2);

        tree.remove_group(g, false);
        assert!(tree.compute_nodes().is_empty());
        assert!(tree.compute_roots().is_empty());
    }

    #[test]
    fn test_children_data_skips_same_master() {
        let mut tree = CollapseTreeModel::new();
        let old = tree.insert_group(n(1), None);
        tree.add_member(old, n(2));
        let new = tree.insert_group(n(1), None);
        tree.reparent(old, Some(new));
        tree.add_member(new, n(3));
        let nested = tree.insert_group(n(3), Some(new));
        tree.add_member(nested, n(4));

        let children: Vec<GroupId> = tree.build_children_data(new).iter().map(|g| g.id()).collect();
        assert_eq!(children, vec![nested]);
        assert_eq!(tree.led_by(n(1)).map(|g| g.id()), Some(new));
    }

    #[test]
    fn test_children_data_of_unknown_group_is_empty() {
        let tree = CollapseTreeModel::new();
        assert!(tree.build_children_data(GroupId(9)).is_empty());
    }

    #[test]
    fn test_remove_nested_group_hands_members_to_parent() {
        let mut tree = CollapseTreeModel::new();
        let outer = tree.insert_group(n(0), None);
        tree.add_member(outer, n(1));
        let inner = tree.insert_group(n(1), Some(outer));
        tree.add_member(inner, n(2));

        let removed = tree.remove_group(inner, true).unwrap();
        assert_eq!(removed.master(), n(1));
        assert_eq!(tree.owner_of(n(2)).map(|g| g.id()), Some(outer));
        assert_eq!(tree.representative(n(2)), n(0));
        assert!(tree.get(outer).unwrap().children().is_empty());
    }
}
