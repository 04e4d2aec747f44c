//! Error types for resolving snapshot inputs.

use thiserror::Error;

/// Error raised when a requested root cannot be turned into a type handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Root spec is not of the form `location.TypeName`.
    #[error("invalid root '{spec}': expected <location>.<TypeName>")]
    InvalidRoot {
        /// Offending spec.
        spec: String,
    },

    /// No known location matches.
    #[error("unknown location '{location}'")]
    UnknownLocation {
        /// Requested location.
        location: String,
    },

    /// More than one location matches.
    #[error("location '{location}' is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousLocation {
        /// Requested location.
        location: String,
        /// Matching locations.
        candidates: Vec<String>,
    },

    /// The location exists but holds no such type.
    #[error("type '{name}' not found in '{location}'")]
    UnknownType {
        /// Resolved location.
        location: String,
        /// Requested type name.
        name: String,
    },

    /// A named type was declared but never given a shape.
    #[error("type '{location}.{name}' was declared but never defined")]
    Undefined {
        /// Defining location.
        location: String,
        /// Type name.
        name: String,
    },
}

/// Result type alias for input resolution.
pub type Result<T> = std::result::Result<T, InputError>;
