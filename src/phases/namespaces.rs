//! Phase 2: Namespace Reconciliation
//!
//! Merges each source root's declared attributes into the combined root.
//! Namespace declarations are the interesting case: two sources may bind the
//! same prefix to different URIs, or different prefixes to the same URI.
//!
//! The invariant maintained on the combined root: prefix aliases are unique,
//! and a URI, once bound, keeps exactly one alias for the remainder of the
//! merge. Sources that disagree get their subtrees rewritten to the
//! canonical alias before extraction.
//!
//! ## Collision handling
//!
//! - Identical declaration already present: no-op.
//! - Same qualified name, different value, not an `xmlns:` declaration:
//!   skipped, first source wins.
//! - Same prefix bound to a different URI: a fresh alias `local_0`,
//!   `local_1`, … is allocated (first unused suffix on the combined root),
//!   the binding is added, and every use of the old prefix in the source
//!   subtree is rewritten.
//! - New prefix for an already-bound URI: no new binding; the source subtree
//!   is rewritten to the existing alias.
//!
//! ## Subtree rewriting
//!
//! A prefix change must reach three kinds of usage besides element and
//! attribute names: `{x:Type ns:Foo}` and `{x:Static ns:Bar.Baz}` markup
//! extension values, and `Property` attribute values that start with the
//! qualified name (e.g. `ns:Control.Template` in style setters).

use log::debug;

use crate::xml::{split_qualified, Element};

/// Merge one source root's declarations into the combined root, rewriting
/// the source subtree wherever its prefixes lose a collision.
pub fn reconcile(combined_root: &mut Element, source_root: &mut Element) {
    // Snapshot: the loop mutates the combined root while walking the
    // source's declarations in document order.
    let declarations = source_root.attributes.clone();
    for attribute in declarations {
        let (prefix, local) = split_qualified(&attribute.name);

        if let Some(existing) = combined_root.attr(&attribute.name) {
            if existing == attribute.value || prefix != Some("xmlns") {
                continue;
            }
            // Same prefix, different URI: allocate a fresh alias and move
            // this source's subtree onto it.
            let alias = allocate_alias(combined_root, local);
            debug!(
                "prefix collision on '{}': rebinding {} as {}",
                local, attribute.value, alias
            );
            combined_root.push_attr(format!("xmlns:{}", alias), attribute.value.clone());
            change_prefix(source_root, local, &alias);
        } else if prefix == Some("xmlns") {
            if let Some(canonical) = existing_alias_for(combined_root, &attribute.value) {
                // URI already bound under another alias: rewrite instead of
                // introducing a duplicate binding.
                debug!(
                    "'{}' already bound as '{}': rewriting source prefix '{}'",
                    attribute.value, canonical, local
                );
                change_prefix(source_root, local, &canonical);
            } else {
                combined_root.push_attr(attribute.name.clone(), attribute.value.clone());
            }
        } else {
            combined_root.push_attr(attribute.name.clone(), attribute.value.clone());
        }
    }
}

/// First unused `local_N` alias on the combined root, trying N = 0, 1, …
fn allocate_alias(combined_root: &Element, local: &str) -> String {
    let mut suffix = 0usize;
    loop {
        let candidate = format!("{}_{}", local, suffix);
        if !combined_root.has_attr(&format!("xmlns:{}", candidate)) {
            return candidate;
        }
        suffix += 1;
    }
}

/// The alias an URI is already bound to on the combined root, if any.
fn existing_alias_for(combined_root: &Element, uri: &str) -> Option<String> {
    combined_root
        .attributes
        .iter()
        .find(|attribute| attribute.prefix() == Some("xmlns") && attribute.value == uri)
        .map(|attribute| attribute.local_name().to_string())
}

/// Rewrite every use of `old` to `new` in the descendants of `element`.
///
/// The element itself is left alone: callers pass the source root, whose
/// own declarations were already consumed by [`reconcile`].
pub fn change_prefix(element: &mut Element, old: &str, new: &str) {
    let old_qualifier = format!("{}:", old);
    let new_qualifier = format!("{}:", new);
    let old_spaced = format!(" {}", old_qualifier);
    let new_spaced = format!(" {}", new_qualifier);

    for child in element.child_elements_mut() {
        if child.prefix() == Some(old) {
            child.name = format!("{}:{}", new, child.local_name());
        }

        for attribute in &mut child.attributes {
            if attribute.prefix() == Some(old) {
                attribute.name = format!("{}:{}", new, attribute.local_name());
            }

            if (attribute.value.contains("{x:Type") || attribute.value.contains("{x:Static"))
                && attribute.value.contains(&old_spaced)
            {
                attribute.value = attribute.value.replace(&old_spaced, &new_spaced);
            }

            if attribute.name == "Property" && attribute.value.starts_with(&old_qualifier) {
                attribute.value = attribute
                    .value
                    .replacen(&old_qualifier, &new_qualifier, 1);
            }
        }

        change_prefix(child, old, new);
    }
}
