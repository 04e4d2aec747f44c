//! # typesnap Schema
//!
//! Universe description loader for typesnap.
//!
//! This crate provides:
//! - XML universe parsing and Go-syntax type expressions
//! - Type definitions for universe elements
//! - Universe validation
//! - Lowering into a [`typesnap_core::TypeGraph`] and root resolution

pub mod error;
pub mod expr;
pub mod lower;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use expr::parse_type_expr;
pub use lower::{lower, lower_into, resolve_roots};
pub use parser::parse_universe;
pub use types::{ChanDir, FieldDecl, PackageDef, TypeDecl, TypeExpr, Universe};
pub use validation::validate_universe;

use typesnap_core::TypeGraph;

/// Parses, validates and lowers a universe document in one step.
///
/// # Errors
/// Returns `SchemaError` if any of the three stages fails.
pub fn load_universe(xml: &str) -> Result<TypeGraph, SchemaError> {
    let universe = parse_universe(xml)?;
    validate_universe(&universe)?;
    lower(&universe)
}

/// Reads and loads a universe document from a file.
///
/// # Errors
/// Returns `SchemaError` if the file cannot be read or loading fails.
pub fn load_universe_file(path: impl AsRef<std::path::Path>) -> Result<TypeGraph, SchemaError> {
    let xml = std::fs::read_to_string(path).map_err(ParseError::Io)?;
    load_universe(&xml)
}
