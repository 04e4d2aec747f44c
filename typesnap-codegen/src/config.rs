//! Snapshot configuration.

/// Name of the tool written into the generated header.
pub const GENERATOR_NAME: &str = "typesnap";

/// Package name used when none is configured.
pub const DEFAULT_PACKAGE: &str = "snapshot";

/// Immutable configuration threaded through naming and rendering.
///
/// # Example
/// ```
/// use typesnap_codegen::SnapshotConfig;
///
/// let config = SnapshotConfig::new()
///     .embed_location("github.com/acme/shop")
///     .suffix("V1")
///     .package_name("frozen");
/// assert_eq!(config.package_name, "frozen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Location whose types always keep their bare names.
    pub embed_location: String,
    /// Suffix appended to every retained non-primitive name.
    pub suffix: String,
    /// Destination package name.
    pub package_name: String,
    /// Whether to emit the generator comment block.
    pub header: bool,
}

impl SnapshotConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the location exempted from prefixing.
    #[must_use]
    pub fn embed_location(mut self, location: impl Into<String>) -> Self {
        self.embed_location = location.into();
        self
    }

    /// Sets the name suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the destination package name.
    #[must_use]
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    /// Enables or disables the generator comment block.
    #[must_use]
    pub fn header(mut self, enabled: bool) -> Self {
        self.header = enabled;
        self
    }

    /// Returns true if `location` is the embed location.
    #[must_use]
    pub fn is_embedded(&self, location: &str) -> bool {
        !self.embed_location.is_empty() && self.embed_location == location
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            embed_location: String::new(),
            suffix: String::new(),
            package_name: DEFAULT_PACKAGE.to_string(),
            header: true,
        }
    }
}
