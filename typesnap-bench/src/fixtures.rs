//! Synthetic type graphs.

use typesnap_core::{Field, NodeId, Primitive, Shape, TypeGraph};

/// Builds `width` packages sharing type names, each holding a chain of
/// `depth` structs that point to the next link.
///
/// Returns the graph and the head of every chain.
#[must_use]
pub fn synthetic_graph(width: usize, depth: usize) -> (TypeGraph, Vec<NodeId>) {
    let mut graph = TypeGraph::new();
    let string = graph.primitive(Primitive::String);
    let int = graph.primitive(Primitive::Int64);
    let mut roots = Vec::with_capacity(width);

    for w in 0..width {
        let location = format!("github.com/org{w}/service/model");
        let mut next: Option<NodeId> = None;
        for d in (0..depth).rev() {
            let (id, _) = graph.declare(&location, &format!("Node{d}"));
            let mut fields = vec![
                Field::new("Name", string).with_tag("json:\"name\""),
                Field::new("Count", int),
            ];
            if let Some(next) = next {
                let link = graph.pointer(next);
                let many = graph.slice(next);
                fields.push(Field::new("Next", link));
                fields.push(Field::new("Children", many));
            }
            graph.define(id, Shape::Struct(fields));
            next = Some(id);
        }
        roots.extend(next);
    }

    (graph, roots)
}
