//! Phase 4: Dependency Ordering
//!
//! Produces a total order over the surviving entries in which every entry
//! appears after the entries it references. References to keys that no
//! entry provides are treated as external and tolerated.
//!
//! The algorithm is a fixed-point pass loop: scan the remaining entries in
//! first-seen order, emit each entry whose referenced keys are all either
//! unknown or already emitted, and repeat. Emissions are visible to later
//! entries within the same pass, so a chain in manifest order resolves in a
//! single pass. A full pass that emits nothing while entries remain means
//! the leftovers only reference each other; that is reported as an
//! [`Error::OrderingCycle`] instead of spinning.
//!
//! Ties are broken by first-seen order, which keeps the output stable
//! across runs and makes re-combining the tool's own output a no-op.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::phases::extract::ResourceEntry;

/// Order entries so that every reference points backwards.
pub fn order_entries(entries: Vec<ResourceEntry>) -> Result<Vec<ResourceEntry>> {
    let known: HashSet<String> = entries.iter().map(|entry| entry.key.clone()).collect();

    let total = entries.len();
    let mut remaining: Vec<Option<ResourceEntry>> = entries.into_iter().map(Some).collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(total);
    let mut ordered: Vec<ResourceEntry> = Vec::with_capacity(total);

    while ordered.len() < total {
        let mut progressed = false;

        for slot in remaining.iter_mut() {
            let ready = slot.as_ref().is_some_and(|entry| {
                entry
                    .used_keys
                    .iter()
                    .all(|key| !known.contains(key) || emitted.contains(key))
            });
            if !ready {
                continue;
            }
            if let Some(entry) = slot.take() {
                emitted.insert(entry.key.clone());
                ordered.push(entry);
                progressed = true;
            }
        }

        if !progressed {
            let stuck: Vec<String> = remaining
                .iter()
                .flatten()
                .map(|entry| entry.key.clone())
                .collect();
            return Err(Error::OrderingCycle {
                keys: stuck.join(", "),
            });
        }
    }

    Ok(ordered)
}
