//! Graphviz DOT export — dump a graph model as a `digraph`.
//!
//! Meant for exposed graphs: collapse, project, then pipe the result into
//! `dot -Tsvg` or diff it in a golden test.
//!
//! ```text
//! Collapser → build_exposed_graph() → export_dot() → digraph { ... }
//! ```

use std::io::Write;

use crate::model::GraphModel;
use crate::Result;

/// Write `graph` as a DOT `digraph`.
///
/// One statement per node (`n<id> [label="..."];`) in node order, then one
/// per edge labeled with the relation's forward name.
pub fn export_dot(graph: &GraphModel, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "digraph exposed {{")?;
    writeln!(writer, "  // Nodes: {}", graph.node_count())?;
    writeln!(writer, "  // Edges: {}", graph.edge_count())?;

    for node in graph.nodes() {
        writeln!(writer, "  n{} [label=\"{}\"];", node.id, escape_label(&node.label))?;
    }

    for edge in graph.edges() {
        writeln!(
            writer,
            "  n{} -> n{} [label=\"{}\"];",
            edge.head,
            edge.tail,
            escape_label(&edge.relation.forward_name),
        )?;
    }

    writeln!(writer, "}}")?;
    Ok(())
}

/// Escape a string for use inside a double-quoted DOT id.
fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
