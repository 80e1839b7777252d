//! Pipeline Orchestrator
//!
//! Drives one combine run end to end: load each manifest source in order,
//! reconcile its namespace declarations into the combined root, extract its
//! keyed entries, then order the accumulated entries and emit the result.
//!
//! Each run owns all of its trees exclusively; source documents are
//! consumed as soon as their entries are extracted. Nothing is shared
//! across runs, and the only external resource touched is the target path
//! (see `phases::write`).

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::phases::{extract, loader, namespaces, ordering, write};
use crate::xml::Element;

/// Default namespace of the combined `ResourceDictionary` root, matching
/// WPF's presentation namespace.
pub const PRESENTATION_NAMESPACE: &str =
    "http://schemas.microsoft.com/winfx/2006/xaml/presentation";

/// Summary of a finished combine run, for caller reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineReport {
    /// Number of source dictionaries read from the manifest.
    pub sources: usize,
    /// Number of resource entries in the combined output.
    pub entries: usize,
    /// Whether the target file was written (false: already up to date).
    pub written: bool,
}

/// Combine the dictionaries listed in `manifest` into `target`.
///
/// Paths are resolved against `base_dir` when not found as given. The
/// target is only rewritten when its content would change.
pub fn combine(manifest: &Path, target: &Path, base_dir: &Path) -> Result<CombineReport> {
    let sources = loader::read_manifest(manifest, base_dir)?;

    let mut combined_root = Element::new("ResourceDictionary");
    combined_root.push_attr("xmlns", PRESENTATION_NAMESPACE);

    let mut seen_keys = HashSet::new();
    let mut entries = Vec::new();

    for source in &sources {
        let mut document = loader::load_source(source, base_dir)?;
        namespaces::reconcile(&mut combined_root, &mut document.root);
        extract::extract_entries(
            document.root,
            &document.path,
            &mut seen_keys,
            &mut entries,
        );
        debug!("{}: {} entries so far", document.path.display(), entries.len());
    }

    let ordered = ordering::order_entries(entries)?;
    let entry_count = ordered.len();
    let written = write::emit(combined_root, ordered, target)?;

    info!(
        "combined {} entries from {} sources into {}{}",
        entry_count,
        sources.len(),
        target.display(),
        if written { "" } else { " (up to date)" }
    );

    Ok(CombineReport {
        sources: sources.len(),
        entries: entry_count,
        written,
    })
}
