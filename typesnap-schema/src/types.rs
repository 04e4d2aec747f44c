//! Universe description types.
//!
//! A universe is the declarative form of an introspection run: the packages
//! that were inspected and the named types each of them declares.

use std::collections::HashMap;

/// Complete universe description.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    /// Package definitions in document order.
    pub packages: Vec<PackageDef>,
    /// Package lookup map (built during parsing).
    package_map: HashMap<String, usize>,
}

impl Universe {
    /// Creates a new empty universe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package definition.
    pub fn add_package(&mut self, package: PackageDef) {
        let index = self.packages.len();
        self.package_map.insert(package.path.clone(), index);
        self.packages.push(package);
    }

    /// Looks up a package by path.
    #[must_use]
    pub fn get_package(&self, path: &str) -> Option<&PackageDef> {
        self.package_map.get(path).map(|&idx| &self.packages[idx])
    }

    /// Returns true if a package with the given path exists.
    #[must_use]
    pub fn has_package(&self, path: &str) -> bool {
        self.package_map.contains_key(path)
    }

    /// Returns the total number of declared types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.packages.iter().map(|p| p.types.len()).sum()
    }
}

/// Package definition.
#[derive(Debug, Clone)]
pub struct PackageDef {
    /// Package path, the defining location of its types.
    pub path: String,
    /// Named types in document order.
    pub types: Vec<TypeDecl>,
}

impl PackageDef {
    /// Creates a new empty package.
    #[must_use]
    pub fn new(path: String) -> Self {
        Self {
            path,
            types: Vec::new(),
        }
    }

    /// Adds a type declaration.
    pub fn add_type(&mut self, decl: TypeDecl) {
        self.types.push(decl);
    }

    /// Looks up a type declaration by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Named type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Type name.
    pub name: String,
    /// Underlying type.
    pub expr: TypeExpr,
    /// Description.
    pub description: Option<String>,
}

impl TypeDecl {
    /// Creates a new type declaration.
    #[must_use]
    pub fn new(name: String, expr: TypeExpr) -> Self {
        Self {
            name,
            expr,
            description: None,
        }
    }
}

/// Struct field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name. For embedded fields this is the type's bare name.
    pub name: String,
    /// Field type.
    pub expr: TypeExpr,
    /// Metadata tag.
    pub tag: Option<String>,
    /// Embedded (anonymous) field.
    pub embedded: bool,
}

impl FieldDecl {
    /// Creates a new field declaration.
    #[must_use]
    pub fn new(name: String, expr: TypeExpr) -> Self {
        Self {
            name,
            expr,
            tag: None,
            embedded: false,
        }
    }
}

/// Channel direction in a type expression.
pub use typesnap_core::ChanDir;

/// Type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Reference to a named type. `location` is `None` for unqualified names,
    /// which resolve to the enclosing package or to a predeclared type.
    Named {
        /// Qualifying package path.
        location: Option<String>,
        /// Type name.
        name: String,
    },
    /// `*T`.
    Pointer(Box<TypeExpr>),
    /// `[]T`.
    Slice(Box<TypeExpr>),
    /// `[N]T`.
    Array {
        /// Length.
        len: usize,
        /// Element.
        elem: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`.
    Chan {
        /// Direction.
        dir: ChanDir,
        /// Element.
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`.
    Map {
        /// Key.
        key: Box<TypeExpr>,
        /// Value.
        value: Box<TypeExpr>,
    },
    /// `func(P...) R` / `func(P...) (R...)`.
    Func {
        /// Parameters.
        params: Vec<TypeExpr>,
        /// Results.
        results: Vec<TypeExpr>,
    },
    /// `interface{}` or `any`.
    Interface,
    /// Anonymous struct.
    Struct(Vec<FieldDecl>),
}

impl TypeExpr {
    /// Creates an unqualified named reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            location: None,
            name: name.into(),
        }
    }

    /// Creates a qualified named reference.
    #[must_use]
    pub fn qualified(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            location: Some(location.into()),
            name: name.into(),
        }
    }

    /// Returns the bare name of the referenced type, looking through pointers.
    ///
    /// This is the implicit name of an embedded field.
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Pointer(elem) => elem.base_name(),
            _ => None,
        }
    }
}
