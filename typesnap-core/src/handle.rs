//! Read-only handles over graph nodes.

use crate::graph::{NodeId, Shape, TypeGraph, TypeNode};
use crate::kind::{ChanDir, Kind};

/// Borrowed view of a single type in a [`TypeGraph`].
///
/// Handles compare and hash by node id, which is the type's identity.
#[derive(Debug, Clone, Copy)]
pub struct TypeHandle<'g> {
    graph: &'g TypeGraph,
    id: NodeId,
}

impl<'g> TypeHandle<'g> {
    pub(crate) const fn new(graph: &'g TypeGraph, id: NodeId) -> Self {
        Self { graph, id }
    }

    fn at(&self, id: NodeId) -> Self {
        Self::new(self.graph, id)
    }

    fn node(&self) -> &'g TypeNode {
        self.graph.node(self.id)
    }

    /// Returns the node id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.node().kind()
    }

    /// Returns the bare name, empty for anonymous types.
    #[must_use]
    pub fn name(&self) -> &'g str {
        self.node().name()
    }

    /// Returns the defining location.
    #[must_use]
    pub fn location(&self) -> &'g str {
        self.node().location()
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &'g Shape {
        self.node().shape()
    }

    /// Returns true if the type has a name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.node().is_named()
    }

    /// Returns true for predeclared types.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.node().is_builtin()
    }

    /// Returns the element type of pointers, slices, arrays, channels and maps.
    #[must_use]
    pub fn elem(&self) -> Option<Self> {
        match self.shape() {
            Shape::Pointer(elem)
            | Shape::Slice(elem)
            | Shape::Array { elem, .. }
            | Shape::Chan { elem, .. } => Some(self.at(*elem)),
            Shape::Map { value, .. } => Some(self.at(*value)),
            _ => None,
        }
    }

    /// Returns the key type of a map.
    #[must_use]
    pub fn map_key(&self) -> Option<Self> {
        match self.shape() {
            Shape::Map { key, .. } => Some(self.at(*key)),
            _ => None,
        }
    }

    /// Returns the length of an array.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.shape() {
            Shape::Array { len, .. } => Some(*len),
            _ => None,
        }
    }

    /// Returns the direction of a channel.
    #[must_use]
    pub fn chan_dir(&self) -> Option<ChanDir> {
        match self.shape() {
            Shape::Chan { dir, .. } => Some(*dir),
            _ => None,
        }
    }

    /// Returns the fields of a struct, empty for other kinds.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldHandle<'g>> {
        match self.shape() {
            Shape::Struct(fields) => fields
                .iter()
                .map(|f| FieldHandle {
                    name: &f.name,
                    tag: f.tag.as_deref(),
                    embedded: f.embedded,
                    ty: self.at(f.ty),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the parameter types of a function.
    #[must_use]
    pub fn params(&self) -> Vec<Self> {
        match self.shape() {
            Shape::Func { params, .. } => params.iter().map(|&p| self.at(p)).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the result types of a function.
    #[must_use]
    pub fn results(&self) -> Vec<Self> {
        match self.shape() {
            Shape::Func { results, .. } => results.iter().map(|&r| self.at(r)).collect(),
            _ => Vec::new(),
        }
    }

    /// Strips every level of pointer indirection.
    ///
    /// Returns the number of levels removed and the pointee. Pointer cycles
    /// such as `type P *P` stop at the last node before the cycle closes.
    #[must_use]
    pub fn dig_pointers(&self) -> (usize, Self) {
        let mut depth = 0;
        let mut current = *self;
        let mut seen = vec![self.id];
        while let Shape::Pointer(elem) = current.shape() {
            if seen.contains(elem) {
                break;
            }
            seen.push(*elem);
            current = current.at(*elem);
            depth += 1;
        }
        (depth, current)
    }
}

impl PartialEq for TypeHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.graph, other.graph)
    }
}

impl Eq for TypeHandle<'_> {}

impl std::hash::Hash for TypeHandle<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Borrowed view of a struct field.
#[derive(Debug, Clone, Copy)]
pub struct FieldHandle<'g> {
    /// Field name.
    pub name: &'g str,
    /// Metadata tag.
    pub tag: Option<&'g str>,
    /// Embedded (anonymous) field.
    pub embedded: bool,
    /// Field type.
    pub ty: TypeHandle<'g>,
}

#[cfg(test)]
mod tests {
    use crate::graph::{Field, Shape, TypeGraph};
    use crate::kind::{ChanDir, Kind, Primitive};

    #[test]
    fn test_handle_accessors() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let int = graph.primitive(Primitive::Int);
        let map = graph.map(string, int);
        let chan = graph.chan(ChanDir::Recv, int);
        let array = graph.array(4, string);

        let h = graph.handle(map);
        assert_eq!(h.kind(), Kind::Map);
        assert_eq!(h.map_key().map(|k| k.id()), Some(string));
        assert_eq!(h.elem().map(|e| e.id()), Some(int));

        let h = graph.handle(chan);
        assert_eq!(h.chan_dir(), Some(ChanDir::Recv));
        assert_eq!(graph.handle(array).len(), Some(4));
        assert_eq!(graph.handle(int).len(), None);
    }

    #[test]
    fn test_dig_pointers() {
        let mut graph = TypeGraph::new();
        let user = graph.named("a", "User", Shape::Struct(Vec::new()));
        let p1 = graph.pointer(user);
        let p2 = graph.pointer(p1);

        let (depth, base) = graph.handle(p2).dig_pointers();
        assert_eq!(depth, 2);
        assert_eq!(base.id(), user);

        let (depth, base) = graph.handle(user).dig_pointers();
        assert_eq!(depth, 0);
        assert_eq!(base.id(), user);
    }

    #[test]
    fn test_dig_pointers_stops_on_cycles() {
        let mut graph = TypeGraph::new();
        let (p, _) = graph.declare("a/p", "P");
        graph.define(p, Shape::Pointer(p));

        let (depth, base) = graph.handle(p).dig_pointers();
        assert_eq!(depth, 0);
        assert_eq!(base.id(), p);

        let (a, _) = graph.declare("a/p", "A");
        let (b, _) = graph.declare("a/p", "B");
        graph.define(a, Shape::Pointer(b));
        graph.define(b, Shape::Pointer(a));

        let (depth, base) = graph.handle(a).dig_pointers();
        assert_eq!(depth, 1);
        assert_eq!(base.id(), b);
        assert_eq!(base.kind(), Kind::Pointer);
    }

    #[test]
    fn test_fields_and_signature() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let err = graph.error_interface();
        let func = graph.func(vec![int, int], vec![err]);
        let user = graph.named(
            "a",
            "User",
            Shape::Struct(vec![
                Field::new("Age", int).with_tag("json:\"age\""),
                Field::new("Check", func),
            ]),
        );

        let fields = graph.handle(user).fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "Age");
        assert_eq!(fields[0].tag, Some("json:\"age\""));
        assert!(!fields[1].embedded);

        let f = graph.handle(func);
        assert_eq!(f.params().len(), 2);
        assert_eq!(f.results()[0].name(), "error");
    }

    #[test]
    fn test_handle_identity() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let string = graph.primitive(Primitive::String);

        assert_eq!(graph.handle(int), graph.handle(int));
        assert_ne!(graph.handle(int), graph.handle(string));
    }
}
