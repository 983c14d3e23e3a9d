//! End-to-end tests for hierarchy construction and hierarchy-driven collapse
//! on a small source tree: directories contain files, files import files.

use std::sync::Arc;

use depgraph_collapse::{
    Collapser, EdgeMatch, GraphModel, NodeId, Relation, RelationMatcher,
};

struct SourceTree {
    graph: Arc<GraphModel>,
    root: NodeId,
    model: NodeId,
    view: NodeId,
    lib: NodeId,
    graph_rs: NodeId,
    node_rs: NodeId,
    render_rs: NodeId,
}

fn contains() -> Relation {
    Relation::new("contains", "contains", "contained in")
}

fn imports() -> Relation {
    Relation::new("imports", "imports", "imported by")
}

/// ```text
/// src/
///   lib.rs
///   model/ graph.rs node.rs
///   view/  render.rs
/// ```
fn source_tree() -> SourceTree {
    let mut graph = GraphModel::new();
    let root = graph.add_node("src");
    let lib = graph.add_node("src/lib.rs");
    let model = graph.add_node("src/model");
    let graph_rs = graph.add_node("src/model/graph.rs");
    let node_rs = graph.add_node("src/model/node.rs");
    let view = graph.add_node("src/view");
    let render_rs = graph.add_node("src/view/render.rs");

    for (dir, child) in [
        (root, lib),
        (root, model),
        (root, view),
        (model, graph_rs),
        (model, node_rs),
        (view, render_rs),
    ] {
        graph.add_edge(contains(), dir, child).unwrap();
    }
    for (from, to) in [
        (lib, graph_rs),
        (lib, render_rs),
        (render_rs, graph_rs),
        (render_rs, node_rs),
        (graph_rs, node_rs),
    ] {
        graph.add_edge(imports(), from, to).unwrap();
    }

    SourceTree {
        graph: Arc::new(graph),
        root,
        model,
        view,
        lib,
        graph_rs,
        node_rs,
        render_rs,
    }
}

#[test]
fn test_containment_hierarchy() {
    let tree = source_tree();
    let matcher = RelationMatcher::new().with_forward("contains");
    let hierarchy = tree.graph.compute_successor_hierarchy(&matcher);

    assert_eq!(hierarchy.roots(), &[tree.root]);
    assert_eq!(hierarchy.children(tree.root), &[tree.lib, tree.model, tree.view]);
    assert_eq!(hierarchy.children(tree.model), &[tree.graph_rs, tree.node_rs]);
    assert_eq!(hierarchy.parent(tree.render_rs), Some(tree.view));
    assert_eq!(hierarchy.depth(tree.node_rs), Some(2));
    assert_eq!(hierarchy.len(), 7);
}

#[test]
fn test_backward_matcher_builds_same_tree() {
    // Same containment, stored as child -> parent.
    let mut graph = GraphModel::new();
    let dir = graph.add_node("dir");
    let a = graph.add_node("dir/a");
    let b = graph.add_node("dir/b");
    let parent_of = Relation::new("in", "is in", "holds");
    graph.add_edge(parent_of.clone(), a, dir).unwrap();
    graph.add_edge(parent_of, b, dir).unwrap();

    let hierarchy = graph.compute_successor_hierarchy(&|r: &Relation| {
        if r.name == "in" { EdgeMatch::Backward } else { EdgeMatch::Unmatched }
    });

    assert_eq!(hierarchy.roots(), &[dir]);
    assert_eq!(hierarchy.children(dir), &[a, b]);
}

#[test]
fn test_collapse_directories_bottom_up() {
    let tree = source_tree();
    let matcher = RelationMatcher::new().with_forward("contains");
    let hierarchy = tree.graph.compute_successor_hierarchy(&matcher);

    let mut collapser = Collapser::new(Arc::clone(&tree.graph));
    let created = collapser.collapse_tree(&hierarchy).unwrap();

    // model/ and view/ first, then src/.
    let masters: Vec<NodeId> = created
        .iter()
        .map(|g| collapser.tree().get(*g).unwrap().master())
        .collect();
    assert_eq!(masters, vec![tree.model, tree.view, tree.root]);

    let exposed = collapser.build_exposed_graph();
    assert_eq!(exposed.node_count(), 1);
    assert_eq!(exposed.edge_count(), 0);

    // Open src/: lib.rs and the two collapsed directories show up.
    collapser.uncollapse(tree.root, false);
    let exposed = collapser.build_exposed_graph();
    assert_eq!(exposed.node_count(), 4);
    assert!(exposed.find_edge(&contains(), tree.root, tree.model).is_some());
    assert!(exposed.find_edge(&imports(), tree.lib, tree.model).is_some());
    assert!(exposed.find_edge(&imports(), tree.lib, tree.view).is_some());
    assert!(exposed.find_edge(&imports(), tree.view, tree.model).is_some());
    // graph.rs -> node.rs is internal to model/.
    assert!(exposed.find_edge(&imports(), tree.model, tree.model).is_none());
    assert_eq!(exposed.edge_count(), 6);
}

#[test]
fn test_children_data_follow_hierarchy() {
    let tree = source_tree();
    let matcher = RelationMatcher::new().with_forward("contains");
    let hierarchy = tree.graph.compute_successor_hierarchy(&matcher);
    let mut collapser = Collapser::new(Arc::clone(&tree.graph));
    collapser.collapse_tree(&hierarchy).unwrap();

    let model = collapser.tree();
    let root_group = model.led_by(tree.root).unwrap();
    let child_masters: Vec<NodeId> = model
        .build_children_data(root_group.id())
        .iter()
        .map(|g| g.master())
        .collect();
    assert_eq!(child_masters, vec![tree.model, tree.view]);
    assert_eq!(model.owner_of(tree.node_rs).map(|g| g.master()), Some(tree.model));
    assert_eq!(model.compute_nodes().len(), 7);
}
