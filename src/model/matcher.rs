//! Edge matchers — which relations count as structural edges.

use hashbrown::HashSet;
use super::Relation;

/// How a relation participates in hierarchy construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeMatch {
    /// Structural edge, parent is the head.
    Forward,
    /// Structural edge, parent is the tail.
    Backward,
    /// Not structural.
    Unmatched,
}

/// Classifies relations for `GraphModel::compute_successor_hierarchy`.
pub trait EdgeMatcher {
    fn classify(&self, relation: &Relation) -> EdgeMatch;

    fn matches_forward(&self, relation: &Relation) -> bool {
        self.classify(relation) == EdgeMatch::Forward
    }

    fn matches_backward(&self, relation: &Relation) -> bool {
        self.classify(relation) == EdgeMatch::Backward
    }
}

impl<F> EdgeMatcher for F
where
    F: Fn(&Relation) -> EdgeMatch,
{
    fn classify(&self, relation: &Relation) -> EdgeMatch {
        self(relation)
    }
}

/// Matches every relation in the forward direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardMatcher;

impl EdgeMatcher for ForwardMatcher {
    fn classify(&self, _relation: &Relation) -> EdgeMatch {
        EdgeMatch::Forward
    }
}

/// Matches relations by name. A name in both sets matches forward.
#[derive(Debug, Clone, Default)]
pub struct RelationMatcher {
    forward: HashSet<String>,
    backward: HashSet<String>,
}

impl RelationMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forward(mut self, name: impl Into<String>) -> Self {
        self.forward.insert(name.into());
        self
    }

    pub fn with_backward(mut self, name: impl Into<String>) -> Self {
        self.backward.insert(name.into());
        self
    }
}

impl EdgeMatcher for RelationMatcher {
    fn classify(&self, relation: &Relation) -> EdgeMatch {
        if self.forward.contains(&relation.name) {
            EdgeMatch::Forward
        } else if self.backward.contains(&relation.name) {
            EdgeMatch::Backward
        } else {
            EdgeMatch::Unmatched
        }
    }
}
