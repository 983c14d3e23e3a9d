//! # Dependency Graph Model
//!
//! Plain data that every other layer reads: nodes, relations, edges, the
//! authoritative `GraphModel`, and the edge matchers used to derive
//! hierarchies from it.
//!
//! Design rule: no collapse state here. A `GraphModel` never learns that a
//! node is hidden; projections build new models.

pub mod node;
pub mod relation;
pub mod graph;
pub mod matcher;

pub use node::{Node, NodeId};
pub use relation::{Relation, Edge};
pub use graph::GraphModel;
pub use matcher::{EdgeMatch, EdgeMatcher, ForwardMatcher, RelationMatcher};
