//! Graph collection.
//!
//! The collector walks from a set of roots to the transitive closure of the
//! types they reference. Each type is recorded once and a recorded type is
//! never walked again, so self-referential graphs terminate.

use std::collections::HashSet;
use typesnap_core::{NodeId, TypeGraph};

/// Deduplicated set of types selected for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedSet {
    ids: HashSet<NodeId>,
}

impl RetainedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of retained types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if `id` is retained.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Inserts `id`, returning whether it was new.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    /// Removes `id`, returning whether it was present.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.ids.remove(&id)
    }

    /// Iterates over the retained ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Removes every anonymous type and returns how many were dropped.
    pub fn drop_anonymous(&mut self, graph: &TypeGraph) -> usize {
        let before = self.ids.len();
        self.ids.retain(|&id| graph.node(id).is_named());
        before - self.ids.len()
    }

    /// Removes and returns every id matching `predicate`.
    pub fn drain_where<F>(&mut self, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        let taken: Vec<NodeId> = self.ids.iter().copied().filter(|&id| predicate(id)).collect();
        for id in &taken {
            self.ids.remove(id);
        }
        taken
    }
}

/// Collector of the types reachable from a set of roots.
pub struct Collector<'g> {
    graph: &'g TypeGraph,
    retained: RetainedSet,
    stack: Vec<NodeId>,
}

impl<'g> Collector<'g> {
    /// Creates a collector over `graph`.
    #[must_use]
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            retained: RetainedSet::new(),
            stack: Vec::new(),
        }
    }

    /// Records a candidate type.
    ///
    /// Builtin types are discarded. Returns true only if the type was not
    /// recorded before.
    pub fn add(&mut self, id: NodeId) -> bool {
        if self.graph.node(id).is_builtin() {
            return false;
        }
        self.retained.insert(id)
    }

    /// Records a root and walks everything it references.
    pub fn add_root(&mut self, id: NodeId) {
        self.add(id);
        self.stack.push(id);
        self.walk();
    }

    fn walk(&mut self) {
        while let Some(id) = self.stack.pop() {
            for child in self.graph.node(id).shape().children() {
                if self.add(child) {
                    self.stack.push(child);
                }
            }
        }
    }

    /// Returns the collected set.
    #[must_use]
    pub fn finish(self) -> RetainedSet {
        self.retained
    }
}

/// Collects the transitive closure of `roots`.
#[must_use]
pub fn collect(graph: &TypeGraph, roots: &[NodeId]) -> RetainedSet {
    let mut collector = Collector::new(graph);
    for &root in roots {
        collector.add_root(root);
    }
    let retained = collector.finish();
    tracing::debug!(
        "Collected {} types from {} roots",
        retained.len(),
        roots.len()
    );
    retained
}
