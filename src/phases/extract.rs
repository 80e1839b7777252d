//! Phase 3: Key & Reference Extraction
//!
//! Promotes each source root's element children into resource entries. An
//! entry needs a key to be referenced or ordered; the key is taken from the
//! first present (and non-empty) of `Key`, `x:Key`, `TargetType`.
//!
//! Children without a key are dropped, as are later duplicates of an
//! already-registered key (first occurrence wins, following manifest
//! order). Both drops are logged at warn level rather than lost silently.
//! `ResourceDictionary.MergedDictionaries` children are skipped outright:
//! their contents are not independently keyed.
//!
//! Alongside the key, every entry records the set of other keys its subtree
//! mentions through `{DynamicResource …}` or `{StaticResource …}` attribute
//! values. The orderer consumes that set.

use std::collections::HashSet;
use std::path::Path;

use log::warn;

use crate::xml::{Element, Node};

/// Marker for dynamic resource references in attribute values.
const DYNAMIC_RESOURCE: &str = "{DynamicResource ";

/// Marker for static resource references in attribute values.
const STATIC_RESOURCE: &str = "{StaticResource ";

/// Nested merged-dictionary container; skipped during extraction.
const MERGED_DICTIONARIES: &str = "ResourceDictionary.MergedDictionaries";

/// One keyed top-level element promoted into the combined dictionary.
#[derive(Debug)]
pub struct ResourceEntry {
    /// Unique identifier within the combined output.
    pub key: String,
    /// The owned subtree, appended to the combined root at emission.
    pub element: Element,
    /// Keys of other entries this subtree references.
    pub used_keys: HashSet<String>,
}

/// Extract keyed entries from a reconciled source root, consuming it.
///
/// `seen_keys` is the global key set shared across all sources; `entries`
/// accumulates surviving entries in first-seen order.
pub fn extract_entries(
    source_root: Element,
    source_path: &Path,
    seen_keys: &mut HashSet<String>,
    entries: &mut Vec<ResourceEntry>,
) {
    for node in source_root.children {
        let Node::Element(element) = node else {
            continue;
        };
        if element.name == MERGED_DICTIONARIES {
            continue;
        }

        let Some(key) = resource_key(&element) else {
            warn!(
                "{}: dropping unkeyed element <{}>",
                source_path.display(),
                element.name
            );
            continue;
        };

        if !seen_keys.insert(key.clone()) {
            warn!(
                "{}: dropping duplicate resource '{}', first occurrence wins",
                source_path.display(),
                key
            );
            continue;
        }

        let used_keys = collect_used_keys(&element);
        entries.push(ResourceEntry {
            key,
            element,
            used_keys,
        });
    }
}

/// Derive the resource key: `Key`, then `x:Key`, then `TargetType`.
fn resource_key(element: &Element) -> Option<String> {
    element
        .attr("Key")
        .or_else(|| element.attr("x:Key"))
        .or_else(|| element.attr("TargetType"))
        .filter(|key| !key.is_empty())
        .map(String::from)
}

/// All keys referenced from attribute values anywhere in the subtree.
pub fn collect_used_keys(element: &Element) -> HashSet<String> {
    let mut keys = HashSet::new();
    scan(element, &mut keys);
    keys
}

fn scan(element: &Element, keys: &mut HashSet<String>) {
    for attribute in &element.attributes {
        for marker in [DYNAMIC_RESOURCE, STATIC_RESOURCE] {
            if let Some(rest) = attribute.value.strip_prefix(marker) {
                let key = rest.strip_suffix('}').unwrap_or(rest).trim();
                if !key.is_empty() {
                    keys.insert(key.to_string());
                }
            }
        }
    }
    for child in element.child_elements() {
        scan(child, keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn extract(source: &str) -> Vec<ResourceEntry> {
        let root = parse_document(source).unwrap();
        let mut seen_keys = HashSet::new();
        let mut entries = Vec::new();
        extract_entries(root, Path::new("test.xaml"), &mut seen_keys, &mut entries);
        entries
    }

    #[test]
    fn test_key_priority_order() {
        let entries = extract(
            r#"<R>
                 <A Key="Local" x:Key="Qualified" TargetType="Typed" />
                 <B x:Key="Qualified" TargetType="Typed" />
                 <C TargetType="Typed" />
               </R>"#,
        );
        let keys: Vec<&str> = entries.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["Local", "Qualified", "Typed"]);
    }

    #[test]
    fn test_unkeyed_and_empty_keyed_elements_are_dropped() {
        let entries = extract(r#"<R><A /><B x:Key="" /><C x:Key="Kept" /></R>"#);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "Kept");
    }

    #[test]
    fn test_duplicate_key_first_occurrence_wins() {
        let entries = extract(
            r#"<R>
                 <A x:Key="K" Marker="first" />
                 <B x:Key="K" Marker="second" />
               </R>"#,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].element.attr("Marker"), Some("first"));
    }

    #[test]
    fn test_merged_dictionaries_child_is_skipped() {
        let entries = extract(
            r#"<R>
                 <ResourceDictionary.MergedDictionaries>
                   <ResourceDictionary Source="other.xaml" />
                 </ResourceDictionary.MergedDictionaries>
                 <A x:Key="K" />
               </R>"#,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "K");
    }

    #[test]
    fn test_used_keys_from_dynamic_and_static_references() {
        let entries = extract(
            r#"<R>
                 <Style x:Key="S" Background="{DynamicResource AccentBrush}">
                   <Setter Value="{StaticResource BorderBrush}" />
                   <Setter Value="{StaticResource  Padded }" />
                 </Style>
               </R>"#,
        );
        let used = &entries[0].used_keys;
        assert_eq!(used.len(), 3);
        assert!(used.contains("AccentBrush"));
        assert!(used.contains("BorderBrush"));
        assert!(used.contains("Padded"));
    }

    #[test]
    fn test_used_keys_found_in_deep_descendants_and_deduplicated() {
        let entries = extract(
            r#"<R>
                 <Style x:Key="S">
                   <Border Background="{DynamicResource Accent}">
                     <Border Background="{DynamicResource Accent}" />
                   </Border>
                 </Style>
               </R>"#,
        );
        assert_eq!(entries[0].used_keys.len(), 1);
        assert!(entries[0].used_keys.contains("Accent"));
    }

    #[test]
    fn test_plain_values_are_not_references() {
        let entries = extract(
            r#"<R><A x:Key="K" Text="DynamicResource Accent" Other="{Binding Path}" /></R>"#,
        );
        assert!(entries[0].used_keys.is_empty());
    }
}
