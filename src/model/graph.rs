//! The authoritative dependency multigraph.
//!
//! A `GraphModel` is built once by an importer and then only read. Nodes and
//! edges are stored in insertion order; lookups go through side indexes.
//!
//! ## Limitations
//!
//! - **No removal**: nodes and edges can only be added. Projections through a
//!   `Collapser` produce new models instead of mutating this one.
//! - **Multi-edges**: duplicate `(relation, head, tail)` triples are kept as
//!   separate edges. `find_edge()` returns the first one.

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::hierarchy::HierarchicalTreeModel;
use crate::{Error, Result};
use super::{Edge, EdgeMatcher, Node, NodeId, Relation};

// ============================================================================
// GraphModel
// ============================================================================

/// Node set plus a labeled, directed multi-edge set.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    /// (head, tail) → positions in `edges`
    pair_index: HashMap<(NodeId, NodeId), SmallVec<[usize; 2]>>,
    outgoing: HashMap<NodeId, Vec<usize>>,
    incoming: HashMap<NodeId, Vec<usize>>,
    next_node_id: u64,
    /// Set once `u64::MAX` is registered and the counter cannot advance.
    ids_exhausted: bool,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Register a new node under the next free id.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = self.free_id();
        self.push_node(Node::new(id, label));
        id
    }

    /// The next unused id. After the counter is exhausted this falls back to
    /// the lowest free id, which always exists below `u64::MAX` nodes.
    fn free_id(&self) -> NodeId {
        let mut candidate = if self.ids_exhausted { 0 } else { self.next_node_id };
        while self.node_index.contains_key(&NodeId(candidate)) {
            candidate = candidate.wrapping_add(1);
        }
        NodeId(candidate)
    }

    /// Register a node with a caller-chosen id.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        self.push_node(node);
        Ok(())
    }

    /// Append without the duplicate check. Callers guarantee a fresh id.
    pub(crate) fn push_node(&mut self, node: Node) {
        if !self.ids_exhausted && node.id.0 >= self.next_node_id {
            match node.id.0.checked_add(1) {
                Some(next) => self.next_node_id = next,
                None => self.ids_exhausted = true,
            }
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Record a directed edge `head -[relation]-> tail`.
    pub fn add_edge(&mut self, relation: Relation, head: NodeId, tail: NodeId) -> Result<()> {
        if !self.contains_node(head) {
            return Err(Error::InvalidNode(head));
        }
        if !self.contains_node(tail) {
            return Err(Error::InvalidNode(tail));
        }

        self.push_edge(relation, head, tail);
        Ok(())
    }

    /// Append without the endpoint check. Callers guarantee both endpoints
    /// are registered.
    pub(crate) fn push_edge(&mut self, relation: Relation, head: NodeId, tail: NodeId) {
        let pos = self.edges.len();
        self.edges.push(Edge::new(relation, head, tail));
        self.pair_index.entry((head, tail)).or_default().push(pos);
        self.outgoing.entry(head).or_default().push(pos);
        self.incoming.entry(tail).or_default().push(pos);
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn find_edge(&self, relation: &Relation, head: NodeId, tail: NodeId) -> Option<&Edge> {
        self.pair_index
            .get(&(head, tail))?
            .iter()
            .map(|&pos| &self.edges[pos])
            .find(|edge| edge.relation == *relation)
    }

    /// Edges whose head is `id`.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&pos| &self.edges[pos])
    }

    /// Edges whose tail is `id`.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&pos| &self.edges[pos])
    }

    /// Distinct relations, in order of first use.
    pub fn relations(&self) -> Vec<&Relation> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .map(|edge| &edge.relation)
            .filter(|relation| seen.insert(*relation))
            .collect()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Build a rooted forest by following matcher-accepted edges.
    ///
    /// Forward matches run head → tail, backward matches tail → head. Roots
    /// are nodes with no matched in-edge; if a cycle leaves nodes unvisited,
    /// the first of them starts a new tree. Parents are assigned first seen
    /// wins, so cycles are broken arbitrarily but deterministically.
    pub fn compute_successor_hierarchy<M>(&self, matcher: &M) -> HierarchicalTreeModel
    where
        M: EdgeMatcher + ?Sized,
    {
        HierarchicalTreeModel::from_successors(self, matcher)
    }
}

// ============================================================================
// Tests
// ============================================================================
