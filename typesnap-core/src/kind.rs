//! Type kind definitions.
//!
//! This module maps the kinds a snapshotted type can have to their canonical
//! Go keywords, along with the primitive set and channel directions.

/// Predeclared primitive type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// Boolean.
    Bool,
    /// Platform-sized signed integer.
    Int,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Platform-sized unsigned integer.
    Uint,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Unsigned integer large enough to hold a pointer.
    Uintptr,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Complex number with float32 parts.
    Complex64,
    /// Complex number with float64 parts.
    Complex128,
    /// UTF-8 string.
    String,
}

impl Primitive {
    /// All primitives, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
    ];

    /// Returns the canonical keyword for this primitive.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
        }
    }

    /// Parses a primitive from its keyword.
    ///
    /// The aliases `byte` and `rune` resolve to `uint8` and `int32`.
    #[must_use]
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "byte" => Some(Self::Uint8),
            "rune" => Some(Self::Int32),
            _ => Self::ALL.into_iter().find(|p| p.keyword() == name),
        }
    }
}

/// Returns true if `name` is one of the primitive keywords.
///
/// Names for which this holds never carry the configured suffix.
#[must_use]
pub fn is_reserved_keyword(name: &str) -> bool {
    Primitive::ALL.iter().any(|p| p.keyword() == name)
}

/// Go keywords that cannot name a type or field.
const GO_KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Returns true if `name` is a valid, non-keyword Go identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !GO_KEYWORDS.contains(&name)
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChanDir {
    /// Bidirectional channel.
    #[default]
    Both,
    /// Send-only channel (`chan<- T`).
    Send,
    /// Receive-only channel (`<-chan T`).
    Recv,
}

impl ChanDir {
    /// Returns the channel keyword with its direction marker.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Both => "chan",
            Self::Send => "chan<-",
            Self::Recv => "<-chan",
        }
    }
}

/// Kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Predeclared primitive.
    Primitive(Primitive),
    /// Pointer to an element type.
    Pointer,
    /// Dynamically sized sequence.
    Slice,
    /// Fixed size sequence.
    Array,
    /// Channel of an element type.
    Chan,
    /// Map from key to value.
    Map,
    /// Function signature.
    Func,
    /// Interface (method sets are never reproduced).
    Interface,
    /// Structure with fields.
    Struct,
    /// Named type declared but never given a shape.
    Unresolved,
}

impl Kind {
    /// Returns the canonical name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.keyword(),
            Self::Pointer => "ptr",
            Self::Slice => "slice",
            Self::Array => "array",
            Self::Chan => "chan",
            Self::Map => "map",
            Self::Func => "func",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Unresolved => "invalid",
        }
    }

    /// Returns true if this is a primitive kind.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Order"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("item2"));
        assert!(is_identifier("Größe"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("with-hyphen"));
        assert!(!is_identifier("func"));
        assert!(!is_identifier("map"));
    }

    #[test]
    fn test_primitive_keyword_roundtrip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_keyword(p.keyword()), Some(p));
        }
    }

    #[test]
    fn test_primitive_aliases() {
        assert_eq!(Primitive::from_keyword("byte"), Some(Primitive::Uint8));
        assert_eq!(Primitive::from_keyword("rune"), Some(Primitive::Int32));
        assert_eq!(Primitive::from_keyword("float"), None);
    }

    #[test]
    fn test_reserved_keyword() {
        assert!(is_reserved_keyword("string"));
        assert!(is_reserved_keyword("uintptr"));
        assert!(!is_reserved_keyword("byte"));
        assert!(!is_reserved_keyword("User"));
    }

    #[test]
    fn test_chan_dir_keyword() {
        assert_eq!(ChanDir::Both.keyword(), "chan");
        assert_eq!(ChanDir::Send.keyword(), "chan<-");
        assert_eq!(ChanDir::Recv.keyword(), "<-chan");
        assert_eq!(ChanDir::default(), ChanDir::Both);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Primitive(Primitive::Int64).to_string(), "int64");
        assert_eq!(Kind::Struct.to_string(), "struct");
        assert!(Kind::Primitive(Primitive::Bool).is_primitive());
        assert!(!Kind::Map.is_primitive());
    }
}
