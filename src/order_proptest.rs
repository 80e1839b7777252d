//! Property-based tests for the dependency orderer.
//!
//! These tests use proptest to generate random acyclic reference graphs and
//! verify that the ordering invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::phases::extract::ResourceEntry;
    use crate::phases::ordering::order_entries;
    use crate::xml::Element;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn entry(key: String, used: HashSet<String>) -> ResourceEntry {
        ResourceEntry {
            key,
            element: Element::new("Resource"),
            used_keys: used,
        }
    }

    /// A random acyclic entry collection: entry `i` may only reference
    /// entries with a smaller index, plus optionally one external key that
    /// no entry provides.
    fn acyclic_entries() -> impl Strategy<Value = Vec<ResourceEntry>> {
        prop::collection::vec((prop::collection::vec(any::<prop::sample::Index>(), 0..4), any::<bool>()), 0..24)
            .prop_map(|specs| {
                specs
                    .iter()
                    .enumerate()
                    .map(|(i, (backrefs, external))| {
                        let mut used: HashSet<String> = backrefs
                            .iter()
                            .filter(|_| i > 0)
                            .map(|index| format!("K{}", index.index(i)))
                            .collect();
                        if *external {
                            used.insert("ExternalKey".to_string());
                        }
                        entry(format!("K{}", i), used)
                    })
                    .collect()
            })
    }

    proptest! {
        /// Property: ordering an acyclic collection always succeeds and
        /// emits every referenced entry before its referrer.
        #[test]
        fn acyclic_graphs_order_topologically(entries in acyclic_entries()) {
            let total = entries.len();
            let ordered = order_entries(entries).expect("acyclic input must order");
            prop_assert_eq!(ordered.len(), total);

            let mut emitted = HashSet::new();
            for entry in &ordered {
                for used in &entry.used_keys {
                    if used != "ExternalKey" {
                        prop_assert!(
                            emitted.contains(used.as_str()),
                            "'{}' emitted before its dependency '{}'",
                            entry.key,
                            used
                        );
                    }
                }
                emitted.insert(entry.key.clone());
            }
        }

        /// Property: every key appears exactly once in the output.
        #[test]
        fn ordering_preserves_the_key_set(entries in acyclic_entries()) {
            let before: HashSet<String> = entries.iter().map(|e| e.key.clone()).collect();
            let ordered = order_entries(entries).expect("acyclic input must order");
            let after: HashSet<String> = ordered.iter().map(|e| e.key.clone()).collect();
            prop_assert_eq!(before, after);
        }

        /// Property: entries with no references keep their relative input
        /// order in the output.
        #[test]
        fn independent_entries_keep_first_seen_order(entries in acyclic_entries()) {
            let free_before: Vec<String> = entries
                .iter()
                .filter(|e| e.used_keys.is_empty())
                .map(|e| e.key.clone())
                .collect();
            let ordered = order_entries(entries).expect("acyclic input must order");
            let free_after: Vec<String> = ordered
                .iter()
                .filter(|e| e.used_keys.is_empty())
                .map(|e| e.key.clone())
                .collect();
            prop_assert_eq!(free_before, free_after);
        }

        /// Property: ordering is deterministic.
        #[test]
        fn ordering_is_deterministic(entries in acyclic_entries()) {
            let copy: Vec<ResourceEntry> = entries
                .iter()
                .map(|e| entry(e.key.clone(), e.used_keys.clone()))
                .collect();
            let first: Vec<String> = order_entries(entries)
                .expect("acyclic input must order")
                .into_iter()
                .map(|e| e.key)
                .collect();
            let second: Vec<String> = order_entries(copy)
                .expect("acyclic input must order")
                .into_iter()
                .map(|e| e.key)
                .collect();
            prop_assert_eq!(first, second);
        }
    }
}
