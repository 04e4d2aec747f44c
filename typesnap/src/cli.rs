//! Command-line interface of the `typesnap` binary.

use crate::output::{default_package_name, keep_rejected, write_atomic};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use typesnap_codegen::config::DEFAULT_PACKAGE;
use typesnap_codegen::{CodegenError, Generator, SnapshotConfig};
use typesnap_core::RootSpec;

/// Snapshot Go type definitions into a single self-contained file.
#[derive(Debug, Parser)]
#[command(name = "typesnap", version)]
#[command(about = "Snapshot type definitions into self-contained Go declarations", long_about = None)]
pub struct Cli {
    /// XML universe describing the packages and their named types
    #[arg(short, long)]
    pub universe: PathBuf,

    /// Root types as `location.TypeName` (space- or comma-separated, repeatable)
    #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
    pub paths: Vec<String>,

    /// Destination file
    #[arg(short, long)]
    pub dst: PathBuf,

    /// Location whose types keep their bare names
    #[arg(
        long,
        visible_alias = "embed-pkg",
        env = "TYPESNAP_EMBED_LOCATION",
        default_value = ""
    )]
    pub embed_location: String,

    /// Suffix appended to every non-primitive type name
    #[arg(long, env = "TYPESNAP_SUFFIX", default_value = "")]
    pub suffix: String,

    /// Package name of the generated file (default: destination directory name)
    #[arg(long)]
    pub dst_pkg: Option<String>,

    /// Keep temporary files when the run fails
    #[arg(long, default_value_t = false)]
    pub leave_temps: bool,

    /// Omit the generator comment
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the root specs named by `--paths`.
    ///
    /// # Errors
    /// Returns `CodegenError::Input` for a malformed spec.
    pub fn roots(&self) -> Result<Vec<RootSpec>, CodegenError> {
        let mut roots = Vec::new();
        for spec in self.paths.iter().flat_map(|p| p.split_whitespace()) {
            roots.push(spec.parse()?);
        }
        Ok(roots)
    }

    /// Builds the snapshot configuration from the flags.
    #[must_use]
    pub fn config(&self) -> SnapshotConfig {
        let package = self
            .dst_pkg
            .clone()
            .or_else(|| default_package_name(&self.dst))
            .unwrap_or_else(|| DEFAULT_PACKAGE.to_string());

        SnapshotConfig::new()
            .embed_location(self.embed_location.clone())
            .suffix(self.suffix.clone())
            .package_name(package)
            .header(!self.no_header)
    }

    /// Loads the universe, generates the snapshot and writes the destination.
    ///
    /// # Errors
    /// Returns the first error hit; the destination is left untouched.
    pub fn run(&self) -> Result<(), CodegenError> {
        let roots = self.roots()?;
        let graph = typesnap_schema::load_universe_file(&self.universe)?;
        tracing::debug!(
            "Loaded {} type nodes from {}",
            graph.len(),
            self.universe.display()
        );

        let mut generator = Generator::with_graph(graph, self.config());
        for root in &roots {
            generator.add_spec(root)?;
        }

        let snapshot = match generator.generate() {
            Ok(snapshot) => snapshot,
            Err(CodegenError::Syntax { message, text }) => {
                if self.leave_temps {
                    keep_rejected(&self.dst, &text)?;
                }
                return Err(CodegenError::Syntax { message, text });
            }
            Err(e) => return Err(e),
        };

        write_atomic(&self.dst, &snapshot, self.leave_temps)
    }
}

/// Installs the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` is honoured unless `verbose` forces debug output.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded in another binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
