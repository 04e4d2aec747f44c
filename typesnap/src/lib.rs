//! # typesnap
//!
//! Snapshot type definitions into self-contained Go declarations.
//!
//! typesnap walks the transitive closure of a set of root types, gives every
//! named type a collision-free name and renders the result as a single Go
//! `type ( ... )` block that no longer depends on the packages the types came
//! from.
//!
//! ## Features
//!
//! - **Two input adapters** - `#[derive(Introspect)]` for Rust structs and XML
//!   universe descriptions for everything else
//! - **Minimal prefixes** - Same-named types from different locations get the
//!   shortest distinguishing path prefix
//! - **Deterministic output** - Declarations grouped by kind and sorted by name
//! - **Atomic writes** - The destination is replaced only by a complete snapshot
//!
//! ## Quick Start
//!
//! ```
//! use typesnap::prelude::*;
//!
//! #[derive(Introspect)]
//! #[typesnap(location = "github.com/acme/shop")]
//! struct Order {
//!     #[typesnap(rename = "ID")]
//!     id: u64,
//!     items: Vec<String>,
//! }
//!
//! let mut generator = Generator::new(SnapshotConfig::new().header(false));
//! generator.add::<Order>();
//! let snapshot = generator.generate().unwrap();
//! assert!(snapshot.contains("\tOrder struct {\n"));
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Type graph, handles and the `Introspect` trait
//! - [`schema`] - XML universe parsing, validation and lowering
//! - [`codegen`] - Collection, naming and Go rendering

pub mod cli;
pub mod output;
pub mod prelude;

/// Type graph, handles and introspection.
pub mod core {
    pub use typesnap_core::*;
}

/// Universe parsing and validation.
pub mod schema {
    pub use typesnap_schema::*;
}

/// Snapshot generation.
pub mod codegen {
    pub use typesnap_codegen::*;
}

// Re-export commonly used items at the crate root
pub use typesnap_codegen::{CodegenError, Generator, SnapshotConfig};
pub use typesnap_core::{Introspect, RootSpec, TypeGraph};
pub use typesnap_derive::Introspect;
