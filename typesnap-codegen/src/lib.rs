//! # typesnap Codegen
//!
//! Flattening of type graphs into self-contained Go declarations.
//!
//! This crate provides:
//! - Collection of the types reachable from a set of roots
//! - Collision detection and prefix synthesis for same-named types
//! - Go rendering with deterministic grouping and ordering
//! - A [`Generator`] pipeline tying the passes together

pub mod collector;
pub mod config;
pub mod error;
pub mod generator;
pub mod go;
pub mod naming;
pub mod syntax;

pub use collector::{Collector, RetainedSet, collect};
pub use config::SnapshotConfig;
pub use error::CodegenError;
pub use generator::Generator;
pub use go::render;
pub use naming::{PrefixTable, resolve_names};

use typesnap_core::RootSpec;

/// Generates a snapshot from a universe description string.
///
/// # Arguments
/// * `xml` - Universe XML content
/// * `roots` - Root types to snapshot
/// * `config` - Snapshot configuration
///
/// # Returns
/// Generated Go source as a string.
///
/// # Errors
/// Returns `CodegenError` if loading, root resolution or generation fails.
pub fn generate_from_xml(
    xml: &str,
    roots: &[RootSpec],
    config: SnapshotConfig,
) -> Result<String, CodegenError> {
    let graph = typesnap_schema::load_universe(xml)?;
    let mut generator = Generator::with_graph(graph, config);
    for root in roots {
        generator.add_spec(root)?;
    }
    generator.generate()
}

/// Generates a snapshot from a universe description file.
///
/// # Arguments
/// * `path` - Path to the universe XML file
/// * `roots` - Root types to snapshot
/// * `config` - Snapshot configuration
///
/// # Returns
/// Generated Go source as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, loading, root resolution or generation
/// fails.
pub fn generate_from_file(
    path: &std::path::Path,
    roots: &[RootSpec],
    config: SnapshotConfig,
) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, roots, config)
}
