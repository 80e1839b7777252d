//! # XAML Combine Library
//!
//! This library merges a list of independently-authored, partially
//! overlapping XAML resource dictionaries into a single dictionary. It is
//! designed to be used by the `xaml-combine` command-line tool but can be
//! called from any build tooling that needs the merge.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = xaml_combine::combine(
//!     Path::new("theme.txt"),
//!     Path::new("Theme.xaml"),
//!     Path::new("."),
//! )?;
//! println!("{} entries, written: {}", report.entries, report.written);
//! # Ok::<(), xaml_combine::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Owned XML tree (`xml`)**: Sources are parsed into trees whose nodes
//!   own their children and whose names keep their literal prefixes, so
//!   namespace rewriting is a plain tree transformation.
//! - **Resource entries (`phases::extract`)**: Each keyed top-level element
//!   becomes one entry carrying the set of other keys it references via
//!   `{DynamicResource …}` / `{StaticResource …}` values.
//! - **Dependency order (`phases::ordering`)**: Entries are emitted after
//!   everything they reference, with ties broken by manifest order.
//! - **Change-only writes (`phases::write`)**: The target file is replaced
//!   atomically and only when its content would change, so unchanged
//!   outputs don't churn timestamps for incremental builds.
//!
//! ## Execution Flow
//!
//! The entry point is [`combine`], which runs the phase pipeline described
//! in the `phases` module: load each source in manifest order, reconcile
//! its namespace declarations into the combined root, extract its keyed
//! entries, then order the full collection once and emit the result.
//!
//! Any failure aborts the whole run; there is no partial output.

pub mod error;
pub mod phases;
pub mod xml;

pub use error::{Error, Result};
pub use phases::orchestrator::{combine, CombineReport, PRESENTATION_NAMESPACE};

#[cfg(test)]
mod order_proptest;
