//! Snapshot generation pipeline.

use crate::collector::collect;
use crate::config::SnapshotConfig;
use crate::error::CodegenError;
use crate::go::render;
use crate::naming::resolve_names;
use typesnap_core::{Introspect, NodeId, RootSpec, TypeGraph};

/// Snapshot generator owning a type graph, its roots and the configuration.
///
/// # Example
/// ```
/// use typesnap_codegen::{Generator, SnapshotConfig};
///
/// let mut generator = Generator::new(SnapshotConfig::new().header(false));
/// generator.add::<Vec<u32>>();
/// let snapshot = generator.generate().unwrap();
/// assert_eq!(snapshot, "package snapshot\n\ntype ()\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    graph: TypeGraph,
    roots: Vec<NodeId>,
    config: SnapshotConfig,
}

impl Generator {
    /// Creates a generator with an empty graph.
    #[must_use]
    pub fn new(config: SnapshotConfig) -> Self {
        Self::with_graph(TypeGraph::new(), config)
    }

    /// Creates a generator over an existing graph.
    #[must_use]
    pub fn with_graph(graph: TypeGraph, config: SnapshotConfig) -> Self {
        Self {
            graph,
            roots: Vec::new(),
            config,
        }
    }

    /// Returns the type graph.
    #[must_use]
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Returns the type graph for direct edits.
    pub fn graph_mut(&mut self) -> &mut TypeGraph {
        &mut self.graph
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Returns the roots added so far.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Describes `T` into the graph and adds it as a root.
    pub fn add<T: Introspect + ?Sized>(&mut self) -> NodeId {
        let id = T::describe(&mut self.graph);
        self.add_root(id);
        id
    }

    /// Adds an existing node as a root.
    pub fn add_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Resolves a root spec against the graph and adds it as a root.
    ///
    /// # Errors
    /// Returns `CodegenError::Input` if the spec cannot be resolved.
    pub fn add_spec(&mut self, spec: &RootSpec) -> Result<NodeId, CodegenError> {
        let id = spec.resolve(&self.graph)?;
        self.add_root(id);
        Ok(id)
    }

    /// Runs collection, name resolution and rendering.
    ///
    /// The graph is left untouched, so repeated calls produce identical
    /// documents.
    ///
    /// # Errors
    /// Returns `CodegenError` if a declared type was never defined or the
    /// document fails the syntax check.
    pub fn generate(&self) -> Result<String, CodegenError> {
        self.graph.check_defined()?;

        let mut retained = collect(&self.graph, &self.roots);
        let prefixes = resolve_names(&self.graph, &mut retained, &self.config);
        tracing::debug!(
            "Resolved {} named types across {} prefixed locations",
            retained.len(),
            prefixes.len()
        );

        let snapshot = render(&self.graph, retained, &prefixes, &self.config)?;
        tracing::info!("Generated snapshot of {} roots", self.roots.len());
        Ok(snapshot)
    }

    /// Generates the snapshot and writes it to `out`.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation or the write fails.
    pub fn write_snapshot<W: std::io::Write>(&self, out: &mut W) -> Result<(), CodegenError> {
        let snapshot = self.generate()?;
        out.write_all(snapshot.as_bytes())?;
        Ok(())
    }
}
