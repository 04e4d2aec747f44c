//! Describing Rust types into a [`TypeGraph`].
//!
//! [`Introspect`] is the in-process introspection adapter: each implementor
//! adds its own description (and, transitively, the descriptions of the types
//! it references) to a graph. User structs implement it through
//! `#[derive(Introspect)]`; this module covers the standard library.

use crate::graph::{Field, NodeId, TypeGraph};
use crate::kind::{ChanDir, Primitive};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

/// A type that can describe its shape into a [`TypeGraph`].
///
/// Named implementations must declare themselves before describing their
/// constituents so that recursive types terminate:
///
/// ```
/// use typesnap_core::{Field, Introspect, NodeId, Shape, TypeGraph};
///
/// struct Node {
///     next: Option<Box<Node>>,
/// }
///
/// impl Introspect for Node {
///     fn describe(graph: &mut TypeGraph) -> NodeId {
///         let (id, fresh) = graph.declare("list", "Node");
///         if fresh {
///             let next = <Option<Box<Node>>>::describe(graph);
///             graph.define(id, Shape::Struct(vec![Field::new("Next", next)]));
///         }
///         id
///     }
/// }
///
/// let mut graph = TypeGraph::new();
/// let id = Node::describe(&mut graph);
/// assert_eq!(graph.node(id).name(), "Node");
/// ```
pub trait Introspect {
    /// Adds the description of `Self` to `graph` and returns its node.
    fn describe(graph: &mut TypeGraph) -> NodeId;
}

macro_rules! impl_primitive {
    ($($ty:ty => $prim:ident),* $(,)?) => {
        $(
            impl Introspect for $ty {
                fn describe(graph: &mut TypeGraph) -> NodeId {
                    graph.primitive(Primitive::$prim)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
    f32 => Float32,
    f64 => Float64,
    char => Int32,
    str => String,
    String => String,
}

macro_rules! impl_transparent {
    ($($ty:ident),*) => {
        $(
            impl<T: Introspect + ?Sized> Introspect for $ty<T> {
                fn describe(graph: &mut TypeGraph) -> NodeId {
                    T::describe(graph)
                }
            }
        )*
    };
}

impl_transparent!(Box, Rc, Arc);

impl<T: Introspect + ?Sized> Introspect for &T {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        T::describe(graph)
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.pointer(elem)
    }
}

impl<T: Introspect> Introspect for [T] {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Introspect> Introspect for VecDeque<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.array(N, elem)
    }
}

impl<K: Introspect, V: Introspect, S> Introspect for HashMap<K, V, S> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let key = K::describe(graph);
        let value = V::describe(graph);
        graph.map(key, value)
    }
}

impl<K: Introspect, V: Introspect> Introspect for BTreeMap<K, V> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let key = K::describe(graph);
        let value = V::describe(graph);
        graph.map(key, value)
    }
}

// Sets become `map[T]struct{}`.
fn describe_set(graph: &mut TypeGraph, elem: NodeId) -> NodeId {
    let unit = graph.structure(Vec::<Field>::new());
    graph.map(elem, unit)
}

impl<T: Introspect, S> Introspect for HashSet<T, S> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        describe_set(graph, elem)
    }
}

impl<T: Introspect> Introspect for BTreeSet<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        describe_set(graph, elem)
    }
}

impl<T: Introspect> Introspect for Sender<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.chan(ChanDir::Send, elem)
    }
}

impl<T: Introspect> Introspect for SyncSender<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.chan(ChanDir::Send, elem)
    }
}

impl<T: Introspect> Introspect for Receiver<T> {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        let elem = T::describe(graph);
        graph.chan(ChanDir::Recv, elem)
    }
}

impl Introspect for dyn std::any::Any {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        graph.interface()
    }
}

impl Introspect for dyn std::any::Any + Send + Sync {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        graph.interface()
    }
}

impl Introspect for dyn std::error::Error + Send + Sync {
    fn describe(graph: &mut TypeGraph) -> NodeId {
        graph.error_interface()
    }
}

macro_rules! impl_fn {
    ($($arg:ident),*) => {
        impl<$($arg: Introspect,)* R: Introspect> Introspect for fn($($arg),*) -> R {
            fn describe(graph: &mut TypeGraph) -> NodeId {
                let params = vec![$($arg::describe(graph)),*];
                let results = vec![R::describe(graph)];
                graph.func(params, results)
            }
        }

        impl<$($arg: Introspect),*> Introspect for fn($($arg),*) {
            fn describe(graph: &mut TypeGraph) -> NodeId {
                let params = vec![$($arg::describe(graph)),*];
                graph.func(params, Vec::new())
            }
        }
    };
}

impl_fn!();
impl_fn!(A);
impl_fn!(A, B);
impl_fn!(A, B, C);
