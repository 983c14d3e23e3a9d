//! Hierarchical tree model — a rooted forest over graph nodes.
//!
//! Derived once from a `GraphModel` and an `EdgeMatcher`, then read-only.
//! The `Collapser` consumes it bottom-up to build nested collapse groups.

use hashbrown::{HashMap, HashSet};

use crate::model::{EdgeMatch, EdgeMatcher, GraphModel, NodeId, Relation};

/// Parent/children links over a set of graph nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchicalTreeModel {
    roots: Vec<NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
    parents: HashMap<NodeId, NodeId>,
    /// Every node in the forest, in visit order.
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl HierarchicalTreeModel {
    /// Depth-first successor walk. See `GraphModel::compute_successor_hierarchy`.
    pub(crate) fn from_successors<M>(graph: &GraphModel, matcher: &M) -> Self
    where
        M: EdgeMatcher + ?Sized,
    {
        // Classify each relation once, not once per edge.
        let mut classes: HashMap<&Relation, EdgeMatch> = HashMap::new();
        for relation in graph.relations() {
            classes.insert(relation, matcher.classify(relation));
        }

        let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut has_parent_edge: HashSet<NodeId> = HashSet::new();
        for edge in graph.edges() {
            if edge.is_self_loop() {
                continue;
            }
            let (from, to) = match classes.get(&edge.relation) {
                Some(EdgeMatch::Forward) => (edge.head, edge.tail),
                Some(EdgeMatch::Backward) => (edge.tail, edge.head),
                _ => continue,
            };
            successors.entry(from).or_default().push(to);
            has_parent_edge.insert(to);
        }

        let mut model = Self::default();
        let mut visited: HashSet<NodeId> = HashSet::new();

        let starts = graph
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|id| !has_parent_edge.contains(id));
        for root in starts {
            model.walk(root, &successors, &mut visited);
        }

        // Whatever is left sits on a matched cycle.
        for node in graph.nodes() {
            if !visited.contains(&node.id) {
                model.walk(node.id, &successors, &mut visited);
            }
        }

        tracing::trace!(
            roots = model.roots.len(),
            nodes = model.order.len(),
            "computed successor hierarchy"
        );
        model
    }

    fn walk(
        &mut self,
        root: NodeId,
        successors: &HashMap<NodeId, Vec<NodeId>>,
        visited: &mut HashSet<NodeId>,
    ) {
        if !visited.insert(root) {
            return;
        }
        self.roots.push(root);
        self.order.push(root);
        self.members.insert(root);

        // (node, index of the next successor to try)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let succ = successors.get(&node).map(Vec::as_slice).unwrap_or(&[]);
            let Some(&child) = succ.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;

            if visited.insert(child) {
                self.parents.insert(child, node);
                self.children.entry(node).or_default().push(child);
                self.order.push(child);
                self.members.insert(child);
                stack.push((child, 0));
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.children(node).is_empty()
    }

    /// Every node in the forest, parents before their children.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Distance from the node's root; `None` if the node is not in the forest.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// Children before parents, siblings in order. Bulk collapse runs in
    /// this order so nested groups exist before their parents pick them up.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.order.len());
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        for &root in &self.roots {
            stack.push((root, 0));
            while let Some((node, next)) = stack.last_mut() {
                let node = *node;
                match self.children(node).get(*next) {
                    Some(&child) => {
                        *next += 1;
                        stack.push((child, 0));
                    }
                    None => {
                        out.push(node);
                        stack.pop();
                    }
                }
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForwardMatcher, RelationMatcher};

    #[test]
    fn test_backward_match_reverses_direction() {
        let mut graph = GraphModel::new();
        let pkg = graph.add_node("pkg");
        let file = graph.add_node("pkg/file.rs");
        graph.add_edge(Relation::named("member-of"), file, pkg).unwrap();

        let matcher = RelationMatcher::new().with_backward("member-of");
        let tree = graph.compute_successor_hierarchy(&matcher);

        assert_eq!(tree.roots(), &[pkg]);
        assert_eq!(tree.children(pkg), &[file]);
        assert_eq!(tree.parent(file), Some(pkg));
    }

    #[test]
    fn test_unmatched_relations_are_ignored() {
        let mut graph = GraphModel::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(Relation::named("calls"), a, b).unwrap();

        let matcher = RelationMatcher::new().with_forward("contains");
        let tree = graph.compute_successor_hierarchy(&matcher);

        assert_eq!(tree.roots(), &[a, b]);
        assert!(tree.is_leaf(a));
    }

    #[test]
    fn test_self_loop_is_not_a_parent_edge() {
        let mut graph = GraphModel::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let rel = Relation::named("contains");
        graph.add_edge(rel.clone(), a, a).unwrap();
        graph.add_edge(rel, a, b).unwrap();

        let tree = graph.compute_successor_hierarchy(&ForwardMatcher);

        assert_eq!(tree.roots(), &[a]);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = GraphModel::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let rel = Relation::named("dep");
        graph.add_edge(rel.clone(), a, b).unwrap();
        graph.add_edge(rel.clone(), b, c).unwrap();
        graph.add_edge(rel, c, a).unwrap();

        let tree = graph.compute_successor_hierarchy(&ForwardMatcher);

        // No node lacks a matched in-edge, so the first node starts the walk.
        assert_eq!(tree.roots(), &[a]);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.children(b), &[c]);
        assert!(tree.is_leaf(c));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.depth(c), Some(2));
        assert!(tree.contains(a));
        assert!(!tree.contains(NodeId(99)));
        assert_eq!(tree.depth(NodeId(99)), None);
    }

    #[test]
    fn test_post_order_children_first() {
        let mut graph = GraphModel::new();
        let root = graph.add_node("root");
        let left = graph.add_node("left");
        let right = graph.add_node("right");
        let leaf = graph.add_node("leaf");
        let rel = Relation::named("contains");
        graph.add_edge(rel.clone(), root, left).unwrap();
        graph.add_edge(rel.clone(), root, right).unwrap();
        graph.add_edge(rel, left, leaf).unwrap();

        let tree = graph.compute_successor_hierarchy(&ForwardMatcher);
        assert_eq!(tree.post_order(), vec![leaf, left, right, root]);
        assert_eq!(tree.nodes(), &[root, left, leaf, right]);
    }
}
