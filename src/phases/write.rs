//! Phase 5: Emitting the Result
//!
//! Appends the ordered entries to the combined root, serializes the
//! document, and replaces the target file only when the content actually
//! changed.
//!
//! ## Process
//!
//! 1. Serialize the combined document.
//! 2. Write it to a sibling temporary file (`<target>.tmp`).
//! 3. Compare the temporary file's content against any existing target.
//! 4. If the target is absent or differs, rename the temporary file over
//!    it; a reader never observes a partially written target.
//! 5. Remove the temporary file on every other path, including failures.
//!
//! Skipping the write on identical content keeps the target's modification
//! time untouched, so downstream incremental builds don't rebuild for
//! nothing.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::phases::extract::ResourceEntry;
use crate::xml::{self, Element, Node};

/// Append the ordered entries to the combined root and write the result.
///
/// Returns `true` when the target file was (re)written, `false` when the
/// existing content was already up to date.
pub fn emit(mut combined_root: Element, entries: Vec<ResourceEntry>, target: &Path) -> Result<bool> {
    for entry in entries {
        combined_root.children.push(Node::Element(entry.element));
    }
    let serialized = xml::serialize_document(&combined_root);
    write_if_changed(target, &serialized)
}

/// Write `content` to `target` through a temporary sibling file, skipping
/// the replace when the existing content is byte-identical.
pub fn write_if_changed(target: &Path, content: &str) -> Result<bool> {
    let temp = temp_path(target);
    fs::write(&temp, content).map_err(|e| write_failure(&temp, e))?;

    let result = replace_if_changed(target, &temp);
    if temp.exists() {
        // Covers both the unchanged case and failures after the temp write.
        let _ = fs::remove_file(&temp);
    }
    result
}

fn replace_if_changed(target: &Path, temp: &Path) -> Result<bool> {
    if target.exists() {
        let existing = fs::read_to_string(target).map_err(|e| write_failure(target, e))?;
        let fresh = fs::read_to_string(temp).map_err(|e| write_failure(temp, e))?;
        if existing == fresh {
            debug!("{} is up to date", target.display());
            return Ok(false);
        }
    }
    fs::rename(temp, target).map_err(|e| write_failure(target, e))?;
    Ok(true)
}

/// Sibling temporary path: the target path with `.tmp` appended.
fn temp_path(target: &Path) -> PathBuf {
    let mut path = target.as_os_str().to_owned();
    path.push(".tmp");
    PathBuf::from(path)
}

fn write_failure(path: &Path, error: std::io::Error) -> Error {
    Error::WriteFailure {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
