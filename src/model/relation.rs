//! Relation (edge kind) and directed edge in the dependency graph.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// An application-defined edge kind.
///
/// The forward name reads head → tail ("imports"), the reverse name reads
/// tail → head ("imported by").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub forward_name: String,
    pub reverse_name: String,
}

impl Relation {
    pub fn new(
        name: impl Into<String>,
        forward_name: impl Into<String>,
        reverse_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            forward_name: forward_name.into(),
            reverse_name: reverse_name.into(),
        }
    }

    /// A relation whose display names are all `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            forward_name: name.clone(),
            reverse_name: name.clone(),
            name,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directed, labeled edge: `head -[relation]-> tail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub relation: Relation,
    pub head: NodeId,
    pub tail: NodeId,
}

impl Edge {
    pub fn new(relation: Relation, head: NodeId, tail: NodeId) -> Self {
        Self { relation, head, tail }
    }

    pub fn is_self_loop(&self) -> bool {
        self.head == self.tail
    }
}
