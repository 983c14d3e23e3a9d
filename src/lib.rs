//! # depgraph-collapse — Dependency Graph Collapse Engine
//!
//! Group graph nodes behind a representative "master" node, nest those groups
//! arbitrarily deep, and project the authoritative graph through them into an
//! "exposed" graph with no self-loops and no duplicate edges.
//!
//! ## Design Principles
//!
//! 1. **Immutable source graph**: a `GraphModel` is built once and shared via `Arc`
//! 2. **Arena + index**: collapse groups live in a `CollapseTreeModel` keyed by
//!    `GroupId`; nodes carry no back-pointers
//! 3. **Projection is disposable**: `build_exposed_graph()` recomputes from scratch
//! 4. **Contract violations fail early**: nothing changes when a call is rejected
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use depgraph_collapse::{Collapser, GraphModel, Relation};
//!
//! # fn example() -> depgraph_collapse::Result<()> {
//! let mut graph = GraphModel::new();
//! let app = graph.add_node("app");
//! let core = graph.add_node("core");
//! let util = graph.add_node("util");
//! let uses = Relation::new("uses", "uses", "used by");
//! graph.add_edge(uses.clone(), app, core)?;
//! graph.add_edge(uses.clone(), app, util)?;
//! graph.add_edge(uses, core, util)?;
//!
//! let mut collapser = Collapser::new(Arc::new(graph));
//! collapser.collapse(core, [core, util], false)?;
//!
//! let exposed = collapser.build_exposed_graph();
//! assert_eq!(exposed.node_count(), 2);
//! assert_eq!(exposed.edge_count(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod hierarchy;
pub mod collapse;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Node, NodeId, Relation, Edge, GraphModel,
    EdgeMatch, EdgeMatcher, ForwardMatcher, RelationMatcher,
};

// ============================================================================
// Re-exports: Hierarchy + Collapse
// ============================================================================

pub use hierarchy::HierarchicalTreeModel;
pub use collapse::{Collapser, CollapseData, CollapseTreeModel, GroupId};
pub use config::CollapserConfig;
pub use export::export_dot;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid node: {0} is not registered in the graph")]
    InvalidNode(NodeId),

    #[error("Duplicate node: {0} is already registered")]
    DuplicateNode(NodeId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
