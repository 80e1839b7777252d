//! Phase 1: Loading Source Documents
//!
//! Reads the manifest (one source path per line, blank lines ignored) and
//! parses each listed dictionary into an owned tree.
//!
//! ## Path Resolution
//!
//! Every path, including the manifest itself, is tried as given first and
//! then relative to the caller-supplied base directory. If neither exists
//! the run fails with [`Error::SourceNotFound`] naming the original,
//! unresolved path. The base directory is an explicit argument; there is no
//! process-global fallback.
//!
//! Manifest order is preserved: it seeds merge precedence for namespace
//! collisions and duplicate keys downstream.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::xml::{self, Element};

/// One parsed source dictionary. Transient: consumed by reconciliation and
/// extraction, never kept past its merge step.
#[derive(Debug)]
pub struct SourceDocument {
    /// The resolved on-disk path the document was read from.
    pub path: PathBuf,
    /// The document root element, owning the whole tree.
    pub root: Element,
}

/// Resolve a manifest or source path: as given, then relative to `base_dir`.
pub fn resolve_path(path: &str, base_dir: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(path);
    if direct.is_file() {
        return Ok(direct);
    }
    let relative = base_dir.join(path);
    if relative.is_file() {
        return Ok(relative);
    }
    Err(Error::SourceNotFound {
        path: path.to_string(),
    })
}

/// Read the manifest and return the listed source paths in order.
pub fn read_manifest(manifest: &Path, base_dir: &Path) -> Result<Vec<String>> {
    let resolved = resolve_path(&manifest.to_string_lossy(), base_dir)?;
    let text = fs::read_to_string(&resolved)?;
    let sources: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    debug!(
        "manifest {} lists {} source(s)",
        resolved.display(),
        sources.len()
    );
    Ok(sources)
}

/// Load and parse one source dictionary.
pub fn load_source(path: &str, base_dir: &Path) -> Result<SourceDocument> {
    let resolved = resolve_path(path, base_dir)?;
    let text = fs::read_to_string(&resolved)?;
    let root = xml::parse_document(&text).map_err(|e| Error::MalformedDocument {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    debug!("loaded {}", resolved.display());
    Ok(SourceDocument {
        path: resolved,
        root,
    })
}
