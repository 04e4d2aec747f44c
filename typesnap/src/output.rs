//! Atomic snapshot output.
//!
//! Snapshots are written to a temporary file next to the destination and
//! renamed into place, so the destination only ever holds a complete
//! document.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use typesnap_codegen::CodegenError;

fn temp_file_in(dst: &Path) -> Result<NamedTempFile, CodegenError> {
    let dir = match dst.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let file = tempfile::Builder::new()
        .prefix(".typesnap-")
        .suffix(".tmp")
        .tempfile_in(&dir)?;
    Ok(file)
}

fn keep(file: NamedTempFile) {
    match file.keep() {
        Ok((_, path)) => tracing::warn!("Left temporary file {}", path.display()),
        Err(e) => tracing::warn!("Failed to keep temporary file: {}", e),
    }
}

/// Atomically replaces `dst` with `contents`.
///
/// Missing parent directories are created. With `leave_temps` the temporary
/// file is kept when the write fails.
///
/// # Errors
/// Returns `CodegenError::Io` if the temporary file cannot be written or
/// renamed.
pub fn write_atomic(dst: &Path, contents: &str, leave_temps: bool) -> Result<(), CodegenError> {
    let mut file = temp_file_in(dst)?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.as_file().sync_all());
    if let Err(e) = written {
        if leave_temps {
            keep(file);
        }
        return Err(e.into());
    }

    match file.persist(dst) {
        Ok(_) => {
            tracing::info!("Wrote snapshot to {}", dst.display());
            Ok(())
        }
        Err(e) => {
            if leave_temps {
                keep(e.file);
            }
            Err(e.error.into())
        }
    }
}

/// Writes a rejected document next to `dst` and keeps it for inspection.
///
/// # Errors
/// Returns `CodegenError::Io` if the file cannot be written.
pub fn keep_rejected(dst: &Path, contents: &str) -> Result<PathBuf, CodegenError> {
    let mut file = temp_file_in(dst)?;
    file.write_all(contents.as_bytes())?;
    let (_, path) = file.keep().map_err(|e| CodegenError::Io(e.error))?;
    tracing::warn!("Left rejected snapshot in {}", path.display());
    Ok(path)
}

/// Returns the default package name for `dst`: its parent directory's name.
#[must_use]
pub fn default_package_name(dst: &Path) -> Option<String> {
    let absolute = std::path::absolute(dst).ok()?;
    absolute
        .parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
