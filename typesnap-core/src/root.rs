//! Root type references.

use crate::error::InputError;
use crate::graph::{NodeId, TypeGraph};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Reference to a root type, written `location.TypeName`.
///
/// The location is everything before the last `.`, so dotted paths such as
/// `github.com/acme/shop.Order` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootSpec {
    /// Defining location, possibly abbreviated to a trailing path suffix.
    pub location: String,
    /// Type name.
    pub name: String,
}

impl RootSpec {
    /// Creates a root spec from its parts.
    #[must_use]
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
        }
    }

    /// Resolves this spec to a named type in `graph`.
    ///
    /// An exact location match wins. Otherwise the location may name a unique
    /// trailing path suffix, so `pkg.User` finds `github.com/acme/pkg.User`.
    ///
    /// # Errors
    /// Returns `InputError` if the location is unknown or ambiguous, or if it
    /// holds no type of that name.
    pub fn resolve(&self, graph: &TypeGraph) -> Result<NodeId, InputError> {
        let locations: BTreeSet<&str> = graph
            .named_types()
            .map(|id| graph.node(id).location())
            .collect();

        let location = if locations.contains(self.location.as_str()) {
            self.location.clone()
        } else {
            let suffix = format!("/{}", self.location);
            let candidates: Vec<&str> = locations
                .iter()
                .copied()
                .filter(|l| l.ends_with(&suffix))
                .collect();
            match candidates.as_slice() {
                [] => {
                    return Err(InputError::UnknownLocation {
                        location: self.location.clone(),
                    });
                }
                [only] => (*only).to_string(),
                _ => {
                    return Err(InputError::AmbiguousLocation {
                        location: self.location.clone(),
                        candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
                    });
                }
            }
        };

        graph
            .lookup(&location, &self.name)
            .ok_or_else(|| InputError::UnknownType {
                location,
                name: self.name.clone(),
            })
    }
}

impl FromStr for RootSpec {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let invalid = || InputError::InvalidRoot {
            spec: spec.to_string(),
        };
        let idx = spec.rfind('.').ok_or_else(invalid)?;
        let (location, name) = (&spec[..idx], &spec[idx + 1..]);
        if location.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(location, name))
    }
}

impl std::fmt::Display for RootSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.location, self.name)
    }
}
