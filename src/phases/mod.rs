//! # Combine Pipeline Phases
//!
//! The combine run is a strictly sequential pipeline; each phase lives in
//! its own submodule and the `orchestrator` wires them together:
//!
//! 1. **Loading (`loader`)**: Read the manifest and parse each source
//!    dictionary, resolving paths against the base directory.
//! 2. **Namespace Reconciliation (`namespaces`)**: Merge root namespace
//!    declarations into the combined root, allocating aliases on collision
//!    and rewriting affected subtrees.
//! 3. **Extraction (`extract`)**: Promote keyed top-level children into
//!    resource entries and record which other keys each one references.
//! 4. **Ordering (`ordering`)**: Topologically order entries so every
//!    reference points backwards; reference cycles are an error.
//! 5. **Emission (`write`)**: Serialize and atomically replace the target,
//!    but only when the content actually changed.

pub mod extract;
pub mod loader;
pub mod namespaces;
pub mod orchestrator;
pub mod ordering;
pub mod write;
