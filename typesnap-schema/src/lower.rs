//! Lowering of a universe into a type graph.
//!
//! Lowering runs in two passes. The first declares every named type so that
//! references, including self references, always find a node. The second
//! gives each declaration its underlying shape.

use crate::error::SchemaError;
use crate::types::{FieldDecl, TypeDecl, TypeExpr, Universe};
use typesnap_core::{Field, NodeId, Primitive, RootSpec, Shape, TypeGraph};

/// Lowers a universe into a new type graph.
///
/// # Errors
/// Returns `SchemaError` if a reference cannot be resolved or a named type
/// is defined in terms of itself only.
pub fn lower(universe: &Universe) -> Result<TypeGraph, SchemaError> {
    let mut graph = TypeGraph::new();
    lower_into(universe, &mut graph)?;
    Ok(graph)
}

/// Lowers a universe into an existing type graph.
///
/// # Errors
/// Returns `SchemaError` if a reference cannot be resolved or a named type
/// is defined in terms of itself only.
pub fn lower_into(universe: &Universe, graph: &mut TypeGraph) -> Result<(), SchemaError> {
    for package in &universe.packages {
        for decl in &package.types {
            graph.declare(&package.path, &decl.name);
        }
    }

    // Declarations whose underlying type is another named type are defined
    // once that type has a shape.
    let mut deferred: Vec<(&str, &TypeDecl)> = Vec::new();

    for package in &universe.packages {
        let mut lowerer = Lowerer::new(graph, &package.path);
        for decl in &package.types {
            if matches!(decl.expr, TypeExpr::Named { .. }) {
                deferred.push((package.path.as_str(), decl));
                continue;
            }
            let context = format!("{}.{}", package.path, decl.name);
            let shape = lowerer.shape(&decl.expr, &context)?;
            let id = lowerer.declared(&decl.name)?;
            lowerer.graph.define(id, shape);
        }
    }

    while !deferred.is_empty() {
        let before = deferred.len();
        let mut pending = Vec::new();

        for (path, decl) in deferred {
            let mut lowerer = Lowerer::new(graph, path);
            let context = format!("{path}.{}", decl.name);
            let shape = lowerer.shape(&decl.expr, &context)?;
            if matches!(shape, Shape::Unresolved) {
                pending.push((path, decl));
                continue;
            }
            let id = lowerer.declared(&decl.name)?;
            lowerer.graph.define(id, shape);
        }

        if pending.len() == before {
            let names: Vec<String> = pending
                .iter()
                .map(|(path, decl)| format!("{path}.{}", decl.name))
                .collect();
            return Err(SchemaError::validation(format!(
                "invalid recursive type definition: {}",
                names.join(", ")
            )));
        }
        deferred = pending;
    }

    graph.check_defined()?;
    Ok(())
}

/// Resolves root specs against a lowered graph.
///
/// # Errors
/// Returns `SchemaError::Input` for the first root that cannot be resolved.
pub fn resolve_roots(graph: &TypeGraph, roots: &[RootSpec]) -> Result<Vec<NodeId>, SchemaError> {
    roots
        .iter()
        .map(|root| root.resolve(graph).map_err(SchemaError::from))
        .collect()
}

/// Expression lowering within one package.
struct Lowerer<'a> {
    graph: &'a mut TypeGraph,
    package: &'a str,
}

impl<'a> Lowerer<'a> {
    fn new(graph: &'a mut TypeGraph, package: &'a str) -> Self {
        Self { graph, package }
    }

    fn declared(&self, name: &str) -> Result<NodeId, SchemaError> {
        self.graph
            .lookup(self.package, name)
            .ok_or_else(|| SchemaError::TypeNotFound {
                name: name.to_string(),
                context: self.package.to_string(),
            })
    }

    /// Resolves a named reference.
    fn named(
        &mut self,
        location: Option<&str>,
        name: &str,
        context: &str,
    ) -> Result<NodeId, SchemaError> {
        let not_found = |written: String| SchemaError::TypeNotFound {
            name: written,
            context: context.to_string(),
        };

        if let Some(location) = location {
            return self
                .graph
                .lookup(location, name)
                .ok_or_else(|| not_found(format!("{location}.{name}")));
        }

        if let Some(id) = self.graph.lookup(self.package, name) {
            return Ok(id);
        }
        if let Some(primitive) = Primitive::from_keyword(name) {
            return Ok(self.graph.primitive(primitive));
        }
        match name {
            "error" => Ok(self.graph.error_interface()),
            "any" => Ok(self.graph.interface()),
            _ => Err(not_found(name.to_string())),
        }
    }

    /// Lowers an expression to a node.
    fn node(&mut self, expr: &TypeExpr, context: &str) -> Result<NodeId, SchemaError> {
        if let TypeExpr::Named { location, name } = expr {
            return self.named(location.as_deref(), name, context);
        }
        let shape = self.shape(expr, context)?;
        self.intern(shape, context)
    }

    /// Lowers an expression to a shape. A named reference yields the shape
    /// of the referenced type, which may still be unresolved.
    fn shape(&mut self, expr: &TypeExpr, context: &str) -> Result<Shape, SchemaError> {
        let shape = match expr {
            TypeExpr::Named { location, name } => {
                let id = self.named(location.as_deref(), name, context)?;
                self.graph.node(id).shape().clone()
            }
            TypeExpr::Pointer(elem) => Shape::Pointer(self.node(elem, context)?),
            TypeExpr::Slice(elem) => Shape::Slice(self.node(elem, context)?),
            TypeExpr::Array { len, elem } => Shape::Array {
                len: *len,
                elem: self.node(elem, context)?,
            },
            TypeExpr::Chan { dir, elem } => Shape::Chan {
                dir: *dir,
                elem: self.node(elem, context)?,
            },
            TypeExpr::Map { key, value } => Shape::Map {
                key: self.node(key, context)?,
                value: self.node(value, context)?,
            },
            TypeExpr::Func { params, results } => Shape::Func {
                params: self.nodes(params, context)?,
                results: self.nodes(results, context)?,
            },
            TypeExpr::Interface => Shape::Interface,
            TypeExpr::Struct(fields) => Shape::Struct(self.fields(fields, context)?),
        };
        Ok(shape)
    }

    fn nodes(&mut self, exprs: &[TypeExpr], context: &str) -> Result<Vec<NodeId>, SchemaError> {
        exprs.iter().map(|e| self.node(e, context)).collect()
    }

    fn fields(&mut self, fields: &[FieldDecl], context: &str) -> Result<Vec<Field>, SchemaError> {
        let mut out = Vec::with_capacity(fields.len());
        for decl in fields {
            let mut field = Field::new(decl.name.as_str(), self.node(&decl.expr, context)?);
            if let Some(tag) = &decl.tag {
                field = field.with_tag(tag.as_str());
            }
            if decl.embedded {
                field = field.embedded();
            }
            out.push(field);
        }
        Ok(out)
    }

    fn intern(&mut self, shape: Shape, context: &str) -> Result<NodeId, SchemaError> {
        let id = match shape {
            Shape::Primitive(p) => self.graph.primitive(p),
            Shape::Pointer(elem) => self.graph.pointer(elem),
            Shape::Slice(elem) => self.graph.slice(elem),
            Shape::Array { len, elem } => self.graph.array(len, elem),
            Shape::Chan { dir, elem } => self.graph.chan(dir, elem),
            Shape::Map { key, value } => self.graph.map(key, value),
            Shape::Func { params, results } => self.graph.func(params, results),
            Shape::Interface => self.graph.interface(),
            Shape::Struct(fields) => self.graph.structure(fields),
            Shape::Unresolved => {
                return Err(SchemaError::validation(format!(
                    "unresolved type referenced from '{context}'"
                )));
            }
        };
        Ok(id)
    }
}
