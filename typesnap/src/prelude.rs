//! Prelude module for convenient imports.
//!
//! ```
//! use typesnap::prelude::*;
//! ```

// Core types
pub use typesnap_core::{
    ChanDir, Field, InputError, Introspect, Kind, NodeId, Primitive, RootSpec, Shape, TypeGraph,
    TypeHandle,
};

// Derive macro
pub use typesnap_derive::Introspect;

// Universe loading
pub use typesnap_schema::{ParseError, SchemaError, load_universe, load_universe_file};

// Generation
pub use typesnap_codegen::{CodegenError, Generator, PrefixTable, RetainedSet, SnapshotConfig};
