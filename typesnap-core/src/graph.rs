//! Interning type graph.
//!
//! Every type description lives in a [`TypeGraph`] arena and is referred to by
//! a [`NodeId`]. Nodes are interned by their [`TypeKey`], so describing the
//! same type twice always yields the same id. Named types are nominal and can
//! be declared before their shape is known, which is how self-referential
//! types are described without infinite recursion.

use crate::error::InputError;
use crate::handle::TypeHandle;
use crate::kind::{ChanDir, Kind, Primitive};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Identifier of a node inside a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identity of a type.
///
/// Named types are keyed by location and name alone and leave the
/// fingerprint empty. Anonymous types have an empty location and name and are
/// keyed by a structural fingerprint built from their constituent node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    /// Defining location (package path).
    pub location: String,
    /// Bare type name.
    pub name: String,
    /// Structural fingerprint.
    pub fingerprint: String,
}

impl TypeKey {
    /// Creates the key of a named type.
    #[must_use]
    pub fn named(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            fingerprint: String::new(),
        }
    }

    /// Creates the key of an anonymous type.
    #[must_use]
    pub fn anonymous(fingerprint: impl Into<String>) -> Self {
        Self {
            location: String::new(),
            name: String::new(),
            fingerprint: fingerprint.into(),
        }
    }
}

/// Struct field description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: NodeId,
    /// Metadata tag, reproduced verbatim.
    pub tag: Option<String>,
    /// Embedded (anonymous) field.
    pub embedded: bool,
}

impl Field {
    /// Creates a named field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: NodeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
            embedded: false,
        }
    }

    /// Sets the metadata tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Marks the field as embedded.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Primitive with the given underlying kind.
    Primitive(Primitive),
    /// Pointer to the element.
    Pointer(NodeId),
    /// Slice of the element.
    Slice(NodeId),
    /// Array of `len` elements.
    Array {
        /// Number of elements.
        len: usize,
        /// Element type.
        elem: NodeId,
    },
    /// Channel of the element.
    Chan {
        /// Direction.
        dir: ChanDir,
        /// Element type.
        elem: NodeId,
    },
    /// Map from key to value.
    Map {
        /// Key type.
        key: NodeId,
        /// Value type.
        value: NodeId,
    },
    /// Function signature.
    Func {
        /// Parameter types.
        params: Vec<NodeId>,
        /// Result types.
        results: Vec<NodeId>,
    },
    /// Interface; methods are not modeled.
    Interface,
    /// Struct with fields in declaration order.
    Struct(Vec<Field>),
    /// Declared but not yet defined.
    Unresolved,
}

impl Shape {
    /// Returns the kind of this shape.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Primitive(p) => Kind::Primitive(*p),
            Self::Pointer(_) => Kind::Pointer,
            Self::Slice(_) => Kind::Slice,
            Self::Array { .. } => Kind::Array,
            Self::Chan { .. } => Kind::Chan,
            Self::Map { .. } => Kind::Map,
            Self::Func { .. } => Kind::Func,
            Self::Interface => Kind::Interface,
            Self::Struct(_) => Kind::Struct,
            Self::Unresolved => Kind::Unresolved,
        }
    }

    /// Returns the constituent types in traversal order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Pointer(elem)
            | Self::Slice(elem)
            | Self::Array { elem, .. }
            | Self::Chan { elem, .. } => vec![*elem],
            Self::Map { key, value } => vec![*key, *value],
            Self::Func { params, results } => params.iter().chain(results).copied().collect(),
            Self::Struct(fields) => fields.iter().map(|f| f.ty).collect(),
            Self::Primitive(_) | Self::Interface | Self::Unresolved => Vec::new(),
        }
    }

    /// Builds the structural fingerprint used to intern anonymous types.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        match self {
            Self::Primitive(p) => p.keyword().to_string(),
            Self::Pointer(elem) => format!("*{elem}"),
            Self::Slice(elem) => format!("[]{elem}"),
            Self::Array { len, elem } => format!("[{len}]{elem}"),
            Self::Chan { dir, elem } => format!("{} {elem}", dir.keyword()),
            Self::Map { key, value } => format!("map[{key}]{value}"),
            Self::Func { params, results } => {
                let mut out = String::from("func(");
                join_ids(&mut out, params);
                out.push_str(")(");
                join_ids(&mut out, results);
                out.push(')');
                out
            }
            Self::Interface => "interface{}".to_string(),
            Self::Struct(fields) => {
                let mut out = String::from("struct{");
                for field in fields {
                    if field.embedded {
                        out.push('~');
                    }
                    let _ = write!(out, "{} {}", field.name, field.ty);
                    if let Some(tag) = &field.tag {
                        let _ = write!(out, " `{tag}`");
                    }
                    out.push(';');
                }
                out.push('}');
                out
            }
            Self::Unresolved => "?".to_string(),
        }
    }
}

fn join_ids(out: &mut String, ids: &[NodeId]) {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{id}");
    }
}

/// A single node of the graph.
#[derive(Debug, Clone)]
pub struct TypeNode {
    key: TypeKey,
    shape: Shape,
    builtin: bool,
}

impl TypeNode {
    /// Returns the identity key.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Returns the bare name, empty for anonymous types.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Returns the defining location, empty for anonymous and builtin types.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.key.location
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.shape.kind()
    }

    /// Returns true for predeclared types, which are always printed inline.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Returns true if the type has a name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.key.name.is_empty()
    }
}

/// Arena of interned type descriptions.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    index: HashMap<TypeKey, NodeId>,
}

impl TypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    /// Returns a handle to the node with the given id.
    #[must_use]
    pub fn handle(&self, id: NodeId) -> TypeHandle<'_> {
        TypeHandle::new(self, id)
    }

    /// Iterates over all node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Looks up a node by key.
    #[must_use]
    pub fn get(&self, key: &TypeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Looks up a named type.
    #[must_use]
    pub fn lookup(&self, location: &str, name: &str) -> Option<NodeId> {
        self.get(&TypeKey::named(location, name))
    }

    fn intern(&mut self, key: TypeKey, shape: Shape, builtin: bool) -> (NodeId, bool) {
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(key.clone(), id);
        self.nodes.push(TypeNode {
            key,
            shape,
            builtin,
        });
        (id, true)
    }

    fn anonymous(&mut self, shape: Shape) -> NodeId {
        let key = TypeKey::anonymous(shape.fingerprint());
        self.intern(key, shape, false).0
    }

    /// Returns the predeclared primitive.
    pub fn primitive(&mut self, primitive: Primitive) -> NodeId {
        let keyword = primitive.keyword();
        let key = TypeKey {
            location: String::new(),
            name: keyword.to_string(),
            fingerprint: keyword.to_string(),
        };
        self.intern(key, Shape::Primitive(primitive), true).0
    }

    /// Returns the predeclared `error` interface.
    pub fn error_interface(&mut self) -> NodeId {
        let key = TypeKey {
            location: String::new(),
            name: "error".to_string(),
            fingerprint: "interface{}".to_string(),
        };
        self.intern(key, Shape::Interface, true).0
    }

    /// Returns a pointer to `elem`.
    pub fn pointer(&mut self, elem: NodeId) -> NodeId {
        self.anonymous(Shape::Pointer(elem))
    }

    /// Returns a slice of `elem`.
    pub fn slice(&mut self, elem: NodeId) -> NodeId {
        self.anonymous(Shape::Slice(elem))
    }

    /// Returns an array of `len` elements.
    pub fn array(&mut self, len: usize, elem: NodeId) -> NodeId {
        self.anonymous(Shape::Array { len, elem })
    }

    /// Returns a channel of `elem`.
    pub fn chan(&mut self, dir: ChanDir, elem: NodeId) -> NodeId {
        self.anonymous(Shape::Chan { dir, elem })
    }

    /// Returns a map from `key` to `value`.
    pub fn map(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.anonymous(Shape::Map { key, value })
    }

    /// Returns a function signature.
    pub fn func(&mut self, params: Vec<NodeId>, results: Vec<NodeId>) -> NodeId {
        self.anonymous(Shape::Func { params, results })
    }

    /// Returns the empty interface.
    pub fn interface(&mut self) -> NodeId {
        self.anonymous(Shape::Interface)
    }

    /// Returns an anonymous struct.
    pub fn structure(&mut self, fields: Vec<Field>) -> NodeId {
        self.anonymous(Shape::Struct(fields))
    }

    /// Declares a named type.
    ///
    /// Returns the node id and whether the declaration was new. A fresh
    /// declaration is [`Shape::Unresolved`] until [`TypeGraph::define`] is
    /// called.
    pub fn declare(&mut self, location: &str, name: &str) -> (NodeId, bool) {
        self.intern(TypeKey::named(location, name), Shape::Unresolved, false)
    }

    /// Gives a declared node its shape, replacing any previous one.
    pub fn define(&mut self, id: NodeId, shape: Shape) {
        self.nodes[id.index()].shape = shape;
    }

    /// Declares and defines a named type in one step.
    ///
    /// An existing declaration keeps its shape unless it is still unresolved.
    pub fn named(&mut self, location: &str, name: &str, shape: Shape) -> NodeId {
        let (id, _) = self.declare(location, name);
        if matches!(self.node(id).shape, Shape::Unresolved) {
            self.define(id, shape);
        }
        id
    }

    /// Iterates over the named, non-builtin types.
    pub fn named_types(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|&id| {
            let node = self.node(id);
            node.is_named() && !node.is_builtin()
        })
    }

    /// Checks that every declared type has been defined.
    ///
    /// # Errors
    /// Returns `InputError::Undefined` for the first unresolved declaration.
    pub fn check_defined(&self) -> Result<(), InputError> {
        match self
            .nodes
            .iter()
            .find(|n| matches!(n.shape, Shape::Unresolved))
        {
            Some(node) => Err(InputError::Undefined {
                location: node.key.location.clone(),
                name: node.key.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_interned() {
        let mut graph = TypeGraph::new();
        let a = graph.primitive(Primitive::Int);
        let b = graph.primitive(Primitive::Int);
        let c = graph.primitive(Primitive::String);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(graph.node(a).is_builtin());
        assert_eq!(graph.node(a).name(), "int");
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_anonymous_types_are_structural() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let s1 = graph.slice(int);
        let s2 = graph.slice(int);
        let p = graph.pointer(int);

        assert_eq!(s1, s2);
        assert_ne!(s1, p);
        assert!(!graph.node(s1).is_named());
        assert_eq!(graph.node(s1).key().fingerprint, format!("[]{int}"));
    }

    #[test]
    fn test_named_types_are_nominal() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let a = graph.named("a/pkg", "User", Shape::Primitive(Primitive::String));
        let b = graph.named("b/pkg", "User", Shape::Primitive(Primitive::String));

        assert_ne!(a, b);
        assert_ne!(a, string);
        assert_eq!(graph.lookup("a/pkg", "User"), Some(a));
        assert_eq!(graph.lookup("c/pkg", "User"), None);
    }

    #[test]
    fn test_declare_then_define_self_reference() {
        let mut graph = TypeGraph::new();
        let (node, fresh) = graph.declare("shop", "Node");
        assert!(fresh);
        assert_eq!(graph.node(node).kind(), Kind::Unresolved);

        let next = graph.pointer(node);
        graph.define(node, Shape::Struct(vec![Field::new("Next", next)]));

        let (again, fresh) = graph.declare("shop", "Node");
        assert_eq!(again, node);
        assert!(!fresh);
        assert_eq!(graph.node(node).kind(), Kind::Struct);
        assert!(graph.check_defined().is_ok());
    }

    #[test]
    fn test_check_defined_reports_unresolved() {
        let mut graph = TypeGraph::new();
        graph.declare("shop", "Missing");

        let err = graph.check_defined().unwrap_err();
        assert!(err.to_string().contains("shop.Missing"));
    }

    #[test]
    fn test_named_keeps_existing_shape() {
        let mut graph = TypeGraph::new();
        let id = graph.named("shop", "Status", Shape::Primitive(Primitive::String));
        let again = graph.named("shop", "Status", Shape::Primitive(Primitive::Int));

        assert_eq!(id, again);
        assert_eq!(graph.node(id).shape(), &Shape::Primitive(Primitive::String));
    }

    #[test]
    fn test_error_interface_is_builtin() {
        let mut graph = TypeGraph::new();
        let err = graph.error_interface();
        let iface = graph.interface();

        assert_ne!(err, iface);
        assert!(graph.node(err).is_builtin());
        assert_eq!(graph.node(err).kind(), Kind::Interface);
        assert!(!graph.node(iface).is_builtin());
    }

    #[test]
    fn test_shape_children_order() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let string = graph.primitive(Primitive::String);
        let func = Shape::Func {
            params: vec![int, string],
            results: vec![string],
        };
        assert_eq!(func.children(), vec![int, string, string]);

        let map = Shape::Map {
            key: string,
            value: int,
        };
        assert_eq!(map.children(), vec![string, int]);
        assert!(Shape::Interface.children().is_empty());
    }

    #[test]
    fn test_struct_fingerprint_includes_tags_and_embedding() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let plain = graph.structure(vec![Field::new("A", int)]);
        let tagged = graph.structure(vec![Field::new("A", int).with_tag("json:\"a\"")]);
        let embedded = graph.structure(vec![Field::new("A", int).embedded()]);

        assert_ne!(plain, tagged);
        assert_ne!(plain, embedded);
        assert_ne!(tagged, embedded);
    }

    #[test]
    fn test_named_types_iterator_skips_builtins() {
        let mut graph = TypeGraph::new();
        graph.primitive(Primitive::Bool);
        graph.error_interface();
        let user = graph.named("a", "User", Shape::Interface);

        assert_eq!(graph.named_types().collect::<Vec<_>>(), vec![user]);
    }
}
