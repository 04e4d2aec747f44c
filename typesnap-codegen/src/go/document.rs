//! Snapshot document assembly.

use crate::collector::RetainedSet;
use crate::config::{GENERATOR_NAME, SnapshotConfig};
use crate::error::CodegenError;
use crate::go::definitions::GoRenderer;
use crate::naming::PrefixTable;
use crate::syntax::validate_document;
use typesnap_core::{Kind, NodeId, TypeGraph};

/// Declaration group, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindGroup {
    /// Channel types.
    Chan,
    /// Array types.
    Array,
    /// Slice types.
    Slice,
    /// Map types.
    Map,
    /// Function types.
    Func,
    /// Interface types.
    Interface,
    /// Struct types.
    Struct,
    /// Everything else.
    Other,
}

impl KindGroup {
    /// All groups in output order.
    pub const ORDER: [Self; 8] = [
        Self::Chan,
        Self::Array,
        Self::Slice,
        Self::Map,
        Self::Func,
        Self::Interface,
        Self::Struct,
        Self::Other,
    ];

    /// Classifies a type by the kind it has once pointers are stripped.
    #[must_use]
    pub fn of(graph: &TypeGraph, id: NodeId) -> Self {
        let (_, target) = graph.handle(id).dig_pointers();
        match target.kind() {
            Kind::Chan => Self::Chan,
            Kind::Array => Self::Array,
            Kind::Slice => Self::Slice,
            Kind::Map => Self::Map,
            Kind::Func => Self::Func,
            Kind::Interface => Self::Interface,
            Kind::Struct => Self::Struct,
            _ => Self::Other,
        }
    }
}

/// One named declaration ready to be written.
struct Declaration {
    name: String,
    location: String,
    id: NodeId,
    body: String,
}

/// Writes the package clause and the generator comment block.
fn write_header(out: &mut String, config: &SnapshotConfig) {
    out.push_str("package ");
    out.push_str(&config.package_name);
    out.push_str("\n\n");
    if config.header {
        out.push_str("//\n");
        out.push_str(&format!(
            "// These types were autogenerated by snapshotting existing types using {GENERATOR_NAME}\n"
        ));
        out.push_str("//\n");
    }
}

/// Renders the retained set into a snapshot document.
///
/// The set is drained group by group; within a group declarations are
/// ordered by display name, then location, then node id.
///
/// # Errors
/// Returns `CodegenError::Syntax` if the assembled document fails the
/// syntax check.
pub fn render(
    graph: &TypeGraph,
    mut retained: RetainedSet,
    prefixes: &PrefixTable,
    config: &SnapshotConfig,
) -> Result<String, CodegenError> {
    let renderer = GoRenderer::new(graph, prefixes, config);
    let mut declarations = Vec::with_capacity(retained.len());

    for group in KindGroup::ORDER {
        let ids = if group == KindGroup::Other {
            retained.drain_where(|_| true)
        } else {
            retained.drain_where(|id| KindGroup::of(graph, id) == group)
        };

        let mut batch: Vec<Declaration> = ids
            .into_iter()
            .map(|id| Declaration {
                name: renderer.declared_name(id),
                location: graph.node(id).location().to_string(),
                id,
                body: renderer.definition(id, 1),
            })
            .collect();
        batch.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.location.cmp(&b.location))
                .then_with(|| a.id.cmp(&b.id))
        });

        if !batch.is_empty() {
            tracing::debug!("Rendered {} {:?} declarations", batch.len(), group);
        }
        declarations.extend(batch);
    }

    let mut out = String::new();
    write_header(&mut out, config);

    if declarations.is_empty() {
        out.push_str("type ()\n");
    } else {
        out.push_str("type (\n");
        for (i, decl) in declarations.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('\t');
            out.push_str(&decl.name);
            out.push(' ');
            out.push_str(&decl.body);
            out.push('\n');
        }
        out.push_str(")\n");
    }

    validate_document(&out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect;
    use crate::naming::resolve_names;
    use typesnap_core::{ChanDir, Field, Primitive, Shape};

    fn snapshot(graph: &TypeGraph, roots: &[NodeId], config: &SnapshotConfig) -> String {
        let mut retained = collect(graph, roots);
        let prefixes = resolve_names(graph, &mut retained, config);
        render(graph, retained, &prefixes, config).expect("Failed to render snapshot")
    }

    #[test]
    fn test_kind_groups_digs_pointers() {
        let mut graph = TypeGraph::new();
        let user = graph.named("p", "User", Shape::Struct(Vec::new()));
        let handle = graph.named("p", "Handle", Shape::Pointer(user));
        let status = graph.named("p", "Status", Shape::Primitive(Primitive::String));

        assert_eq!(KindGroup::of(&graph, user), KindGroup::Struct);
        assert_eq!(KindGroup::of(&graph, handle), KindGroup::Struct);
        assert_eq!(KindGroup::of(&graph, status), KindGroup::Other);
    }

    #[test]
    fn test_empty_snapshot() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let text = snapshot(&graph, &[int], &SnapshotConfig::new());

        let expected = "package snapshot\n\n\
                        //\n\
                        // These types were autogenerated by snapshotting existing types using typesnap\n\
                        //\n\
                        type ()\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_group_order_and_alphabetical_within_group() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let zeta = graph.named("p", "Zeta", Shape::Struct(vec![Field::new("N", int)]));
        let alpha = graph.named("p", "Alpha", Shape::Struct(Vec::new()));
        let events = graph.named(
            "p",
            "Events",
            Shape::Chan {
                dir: ChanDir::Both,
                elem: int,
            },
        );
        let ids = graph.named("p", "IDs", Shape::Slice(int));
        let status = graph.named("p", "Status", Shape::Primitive(Primitive::String));
        let any = graph.named("p", "Any", Shape::Interface);

        let config = SnapshotConfig::new().package_name("frozen").header(false);
        let text = snapshot(&graph, &[zeta, alpha, events, ids, status, any], &config);

        let expected = "package frozen\n\n\
                        type (\n\
                        \tEvents chan int\n\
                        \n\
                        \tIDs []int\n\
                        \n\
                        \tAny interface{}\n\
                        \n\
                        \tAlpha struct{}\n\
                        \n\
                        \tZeta struct {\n\
                        \t\tN int\n\
                        \t}\n\
                        \n\
                        \tStatus string\n\
                        )\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut graph = TypeGraph::new();
        let a = graph.named("a/pkg", "User", Shape::Struct(Vec::new()));
        let b = graph.named("b/pkg", "User", Shape::Struct(Vec::new()));
        let config = SnapshotConfig::new();

        let first = snapshot(&graph, &[a, b], &config);
        let second = snapshot(&graph, &[b, a], &config);
        assert_eq!(first, second);
        assert!(first.contains("\tAPkgUser struct{}\n"));
        assert!(first.contains("\tBPkgUser struct{}\n"));
    }

    #[test]
    fn test_duplicate_display_names_fail_syntax_check() {
        let mut graph = TypeGraph::new();
        let a = graph.named("a", "User", Shape::Interface);
        let mut retained = collect(&graph, &[a]);
        let b = graph.named("b", "User", Shape::Interface);
        retained.insert(b);

        let result = render(&graph, retained, &PrefixTable::new(), &SnapshotConfig::new());
        assert!(matches!(result, Err(CodegenError::Syntax { .. })));
    }
}
