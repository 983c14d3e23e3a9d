//! # Collapse Engine
//!
//! Groups of nodes hidden behind a master node, nested arbitrarily deep, and
//! the projection of the authoritative graph through them.
//!
//! | Type | Module | Role |
//! |------|--------|------|
//! | `CollapseData` | `data` | One group: master, direct members, child links |
//! | `CollapseTreeModel` | `tree` | Arena of groups plus reverse indexes |
//! | `Collapser` | `collapser` | Mutations and exposed-graph projection |

pub mod data;
pub mod tree;
pub mod collapser;

pub use data::{CollapseData, GroupId};
pub use tree::CollapseTreeModel;
pub use collapser::Collapser;
