//! Go type definition synthesis.

use crate::config::SnapshotConfig;
use crate::naming::{PrefixTable, display_name};
use typesnap_core::{ChanDir, Field, NodeId, Shape, TypeGraph};

/// Renderer of type references and definitions in Go syntax.
pub struct GoRenderer<'a> {
    graph: &'a TypeGraph,
    prefixes: &'a PrefixTable,
    config: &'a SnapshotConfig,
}

impl<'a> GoRenderer<'a> {
    /// Creates a new renderer.
    #[must_use]
    pub fn new(graph: &'a TypeGraph, prefixes: &'a PrefixTable, config: &'a SnapshotConfig) -> Self {
        Self {
            graph,
            prefixes,
            config,
        }
    }

    /// Returns the name under which a named type is declared.
    #[must_use]
    pub fn declared_name(&self, id: NodeId) -> String {
        display_name(self.graph, id, self.prefixes, self.config)
    }

    /// Renders a reference to a type.
    ///
    /// Named types are referenced by their display name; anonymous types are
    /// spelled out inline. `depth` is the indentation level of the line the
    /// reference starts on.
    #[must_use]
    pub fn type_name(&self, id: NodeId, depth: usize) -> String {
        let node = self.graph.node(id);
        if node.is_named() {
            self.declared_name(id)
        } else {
            self.shape(node.shape(), depth)
        }
    }

    /// Renders the underlying definition of a named type.
    #[must_use]
    pub fn definition(&self, id: NodeId, depth: usize) -> String {
        self.shape(self.graph.node(id).shape(), depth)
    }

    fn shape(&self, shape: &Shape, depth: usize) -> String {
        match shape {
            Shape::Primitive(p) => p.keyword().to_string(),
            Shape::Pointer(elem) => format!("*{}", self.type_name(*elem, depth)),
            Shape::Slice(elem) => format!("[]{}", self.type_name(*elem, depth)),
            Shape::Array { len, elem } => format!("[{len}]{}", self.type_name(*elem, depth)),
            Shape::Chan { dir, elem } => self.chan(*dir, *elem, depth),
            Shape::Map { key, value } => format!(
                "map[{}]{}",
                self.type_name(*key, depth),
                self.type_name(*value, depth)
            ),
            Shape::Func { params, results } => self.func(params, results, depth),
            Shape::Interface | Shape::Unresolved => "interface{}".to_string(),
            Shape::Struct(fields) => self.structure(fields, depth),
        }
    }

    fn chan(&self, dir: ChanDir, elem: NodeId, depth: usize) -> String {
        let elem_node = self.graph.node(elem);
        let elem_text = self.type_name(elem, depth);
        // `chan <-chan T` would bind the arrow to the outer channel.
        let needs_parens = dir != ChanDir::Recv
            && !elem_node.is_named()
            && matches!(
                elem_node.shape(),
                Shape::Chan {
                    dir: ChanDir::Recv,
                    ..
                }
            );
        if needs_parens {
            format!("{} ({elem_text})", dir.keyword())
        } else {
            format!("{} {elem_text}", dir.keyword())
        }
    }

    fn func(&self, params: &[NodeId], results: &[NodeId], depth: usize) -> String {
        let join = |ids: &[NodeId]| {
            ids.iter()
                .map(|&id| self.type_name(id, depth))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = format!("func({})", join(params));
        match results {
            [] => {}
            [single] => {
                out.push(' ');
                out.push_str(&self.type_name(*single, depth));
            }
            _ => {
                out.push_str(" (");
                out.push_str(&join(results));
                out.push(')');
            }
        }
        out
    }

    /// Renders a struct body with gofmt column alignment.
    fn structure(&self, fields: &[Field], depth: usize) -> String {
        if fields.is_empty() {
            return "struct{}".to_string();
        }

        let lines: Vec<FieldLine> = fields
            .iter()
            .map(|field| FieldLine {
                name: (!field.embedded).then(|| field.name.clone()),
                ty: self.type_name(field.ty, depth + 1),
                tag: field.tag.as_ref().map(|tag| format!("`{tag}`")),
            })
            .collect();

        let indent = "\t".repeat(depth + 1);
        let mut out = String::from("struct {\n");
        for section in sections(&lines) {
            write_section(&mut out, section, &indent);
        }
        out.push_str(&"\t".repeat(depth));
        out.push('}');
        out
    }
}

/// One rendered struct field.
struct FieldLine {
    name: Option<String>,
    ty: String,
    tag: Option<String>,
}

impl FieldLine {
    fn is_multiline(&self) -> bool {
        self.ty.contains('\n')
    }
}

/// Splits fields into alignment sections.
///
/// An embedded field stands alone. A multi-line field closes the section it
/// starts in.
fn sections(lines: &[FieldLine]) -> Vec<&[FieldLine]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.name.is_none() {
            if start < i {
                out.push(&lines[start..i]);
            }
            out.push(&lines[i..=i]);
            start = i + 1;
        } else if line.is_multiline() {
            out.push(&lines[start..=i]);
            start = i + 1;
        }
    }
    if start < lines.len() {
        out.push(&lines[start..]);
    }
    out
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn write_section(out: &mut String, section: &[FieldLine], indent: &str) {
    let name_width = section
        .iter()
        .filter_map(|line| line.name.as_deref())
        .map(width)
        .max()
        .unwrap_or(0);

    // Tags align across runs of consecutive tagged single-line fields.
    let mut type_widths = vec![0; section.len()];
    let mut run_start = 0;
    for i in 0..=section.len() {
        let tagged = section
            .get(i)
            .is_some_and(|line| line.tag.is_some() && !line.is_multiline());
        if !tagged {
            let run_width = section[run_start..i]
                .iter()
                .map(|line| width(&line.ty))
                .max()
                .unwrap_or(0);
            for slot in &mut type_widths[run_start..i] {
                *slot = run_width;
            }
            run_start = i + 1;
        }
    }

    for (line, type_width) in section.iter().zip(type_widths) {
        out.push_str(indent);
        if let Some(name) = &line.name {
            out.push_str(name);
            out.push_str(&" ".repeat(name_width - width(name) + 1));
        }
        out.push_str(&line.ty);
        if let Some(tag) = &line.tag {
            let pad = if line.is_multiline() {
                1
            } else {
                type_width.saturating_sub(width(&line.ty)) + 1
            };
            out.push_str(&" ".repeat(pad));
            out.push_str(tag);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typesnap_core::Primitive;

    fn render_with<F>(build: F) -> String
    where
        F: FnOnce(&mut TypeGraph) -> NodeId,
    {
        let mut graph = TypeGraph::new();
        let id = build(&mut graph);
        let prefixes = PrefixTable::new();
        let config = SnapshotConfig::new();
        GoRenderer::new(&graph, &prefixes, &config).type_name(id, 1)
    }

    #[test]
    fn test_composite_references() {
        let text = render_with(|g| {
            let int = g.primitive(Primitive::Int);
            let string = g.primitive(Primitive::String);
            let ptr = g.pointer(int);
            let ptr2 = g.pointer(ptr);
            let slice = g.slice(ptr2);
            let arr = g.array(4, slice);
            g.map(string, arr)
        });
        assert_eq!(text, "map[string][4][]**int");
    }

    #[test]
    fn test_channel_directions() {
        assert_eq!(
            render_with(|g| {
                let int = g.primitive(Primitive::Int);
                g.chan(ChanDir::Recv, int)
            }),
            "<-chan int"
        );
        assert_eq!(
            render_with(|g| {
                let int = g.primitive(Primitive::Int);
                g.chan(ChanDir::Send, int)
            }),
            "chan<- int"
        );
        assert_eq!(
            render_with(|g| {
                let int = g.primitive(Primitive::Int);
                let recv = g.chan(ChanDir::Recv, int);
                g.chan(ChanDir::Both, recv)
            }),
            "chan (<-chan int)"
        );
    }

    #[test]
    fn test_func_signatures() {
        assert_eq!(render_with(|g| g.func(Vec::new(), Vec::new())), "func()");
        assert_eq!(
            render_with(|g| {
                let int = g.primitive(Primitive::Int);
                let string = g.primitive(Primitive::String);
                g.func(vec![int, string], vec![string])
            }),
            "func(int, string) string"
        );
        assert_eq!(
            render_with(|g| {
                let int = g.primitive(Primitive::Int);
                let err = g.error_interface();
                g.func(vec![int], vec![int, err])
            }),
            "func(int) (int, error)"
        );
    }

    #[test]
    fn test_named_reference_uses_display_name() {
        let mut graph = TypeGraph::new();
        let user = graph.named("a/pkg", "User", Shape::Interface);
        let users = graph.slice(user);
        let mut prefixes = PrefixTable::new();
        prefixes.insert("a/pkg", "APkg");
        let config = SnapshotConfig::new().suffix("V1");

        let renderer = GoRenderer::new(&graph, &prefixes, &config);
        assert_eq!(renderer.type_name(users, 1), "[]APkgUserV1");
        assert_eq!(renderer.definition(user, 1), "interface{}");
    }

    #[test]
    fn test_struct_alignment() {
        let text = render_with(|g| {
            let int = g.primitive(Primitive::Int64);
            let string = g.primitive(Primitive::String);
            let strings = g.slice(string);
            g.structure(vec![
                Field::new("ID", int).with_tag("json:\"id\""),
                Field::new("Name", string).with_tag("json:\"name\""),
                Field::new("Labels", strings),
            ])
        });
        let expected = "struct {\n\
                        \t\tID     int64  `json:\"id\"`\n\
                        \t\tName   string `json:\"name\"`\n\
                        \t\tLabels []string\n\
                        \t}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_nested_struct_and_embedding() {
        let text = render_with(|g| {
            let string = g.primitive(Primitive::String);
            let base = g.named("p", "Base", Shape::Struct(Vec::new()));
            let meta = g.structure(vec![Field::new("Note", string)]);
            g.structure(vec![
                Field::new("Base", base).embedded(),
                Field::new("ID", string),
                Field::new("Meta", meta),
                Field::new("Name", string),
            ])
        });
        let expected = "struct {\n\
                        \t\tBase\n\
                        \t\tID   string\n\
                        \t\tMeta struct {\n\
                        \t\t\tNote string\n\
                        \t\t}\n\
                        \t\tName string\n\
                        \t}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_struct() {
        assert_eq!(render_with(|g| g.structure(Vec::new())), "struct{}");
    }
}
