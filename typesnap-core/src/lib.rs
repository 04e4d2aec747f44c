//! # typesnap Core
//!
//! Type descriptions shared by every typesnap crate.
//!
//! This crate provides:
//! - Kind, primitive and channel direction definitions
//! - The interning [`TypeGraph`] arena and [`TypeHandle`] views over it
//! - The [`Introspect`] trait describing Rust types into a graph
//! - Root references and input error types

pub mod error;
pub mod graph;
pub mod handle;
pub mod introspect;
pub mod kind;
pub mod root;

pub use error::{InputError, Result};
pub use graph::{Field, NodeId, Shape, TypeGraph, TypeKey, TypeNode};
pub use handle::{FieldHandle, TypeHandle};
pub use introspect::Introspect;
pub use kind::{ChanDir, Kind, Primitive, is_identifier, is_reserved_keyword};
pub use root::RootSpec;
