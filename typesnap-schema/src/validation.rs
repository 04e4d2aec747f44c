//! Universe validation utilities.
//!
//! This module checks a parsed universe for declarations that could never be
//! rendered: duplicate names, empty package paths and invalid identifiers.
//! Reference resolution happens later, during lowering.

use crate::error::SchemaError;
use crate::types::{FieldDecl, PackageDef, TypeExpr, Universe};
use std::collections::HashSet;
use typesnap_core::is_identifier;

/// Validates a parsed universe for correctness.
///
/// # Arguments
/// * `universe` - The universe to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_universe(universe: &Universe) -> Result<(), SchemaError> {
    let mut seen_packages = HashSet::new();

    for package in &universe.packages {
        if package.path.trim().is_empty() {
            return Err(SchemaError::validation("package path must not be empty"));
        }
        if !seen_packages.insert(package.path.as_str()) {
            return Err(SchemaError::duplicate("package", &package.path));
        }
        validate_package(package)?;
    }

    Ok(())
}

/// Validates the type declarations of one package.
fn validate_package(package: &PackageDef) -> Result<(), SchemaError> {
    let mut seen_types = HashSet::new();

    for decl in &package.types {
        if !is_identifier(&decl.name) {
            return Err(SchemaError::validation(format!(
                "invalid type name '{}' in package '{}'",
                decl.name, package.path
            )));
        }
        if !seen_types.insert(decl.name.as_str()) {
            return Err(SchemaError::duplicate(
                "type",
                format!("{}.{}", package.path, decl.name),
            ));
        }
        let context = format!("{}.{}", package.path, decl.name);
        validate_expr(&decl.expr, &context)?;
    }

    Ok(())
}

/// Validates every struct nested inside a type expression.
fn validate_expr(expr: &TypeExpr, context: &str) -> Result<(), SchemaError> {
    match expr {
        TypeExpr::Struct(fields) => validate_fields(fields, context),
        TypeExpr::Pointer(elem)
        | TypeExpr::Slice(elem)
        | TypeExpr::Array { elem, .. }
        | TypeExpr::Chan { elem, .. } => validate_expr(elem, context),
        TypeExpr::Map { key, value } => {
            validate_expr(key, context)?;
            validate_expr(value, context)
        }
        TypeExpr::Func { params, results } => {
            for expr in params.iter().chain(results) {
                validate_expr(expr, context)?;
            }
            Ok(())
        }
        TypeExpr::Named { .. } | TypeExpr::Interface => Ok(()),
    }
}

/// Validates the fields of a struct.
fn validate_fields(fields: &[FieldDecl], context: &str) -> Result<(), SchemaError> {
    let mut seen_fields = HashSet::new();

    for field in fields {
        if !is_identifier(&field.name) {
            return Err(SchemaError::validation(format!(
                "invalid field name '{}' in '{context}'",
                field.name
            )));
        }
        if field.embedded && field.expr.base_name().is_none() {
            return Err(SchemaError::validation(format!(
                "embedded field '{}' in '{context}' must reference a named type",
                field.name
            )));
        }
        if field.tag.as_deref().is_some_and(|tag| tag.contains('`')) {
            return Err(SchemaError::validation(format!(
                "tag of field '{}' in '{context}' contains a backquote",
                field.name
            )));
        }
        if !seen_fields.insert(field.name.as_str()) {
            return Err(SchemaError::duplicate(
                "field",
                format!("{context}.{}", field.name),
            ));
        }
        validate_expr(&field.expr, context)?;
    }

    Ok(())
}
