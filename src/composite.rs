//! Index of multi-word municipality names and the single-word municipality
//! names hidden inside them.
//!
//! "Feira de Santana" contains "santana", and if "Santana" is itself a
//! municipality, a candidate list holding both would report the standalone
//! one as a second match. The index lets the extractor spot that case.

use std::collections::{HashMap, HashSet};

/// Maps each normalized multi-word name to its normalized components that
/// are also municipality names, plus the reverse direction for lookups by
/// component.
#[derive(Debug, Clone, Default)]
pub struct CompositeIndex {
    components: HashMap<String, Vec<String>>,
    parents: HashMap<String, Vec<String>>,
}

impl CompositeIndex {
    /// Build the index from the set of normalized municipality names.
    ///
    /// A name is composite when it contains internal whitespace. Each of its
    /// whitespace-separated tokens that is itself a key of `known` becomes a
    /// component; components keep their first-seen order and are not repeated.
    pub fn build<'a, I>(normalized_names: I, known: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();
        for name in normalized_names {
            if !name.trim().contains(char::is_whitespace) {
                continue;
            }
            for token in name.split_whitespace() {
                if !known.contains(token) {
                    continue;
                }
                let components = index.components.entry(name.to_string()).or_default();
                if components.iter().any(|c| c == token) {
                    continue;
                }
                components.push(token.to_string());

                let parents = index.parents.entry(token.to_string()).or_default();
                if !parents.iter().any(|p| p == name) {
                    parents.push(name.to_string());
                }
            }
        }
        index
    }

    /// Components recorded for a normalized multi-word name, if any.
    pub fn components_of(&self, multi_word: &str) -> Option<&[String]> {
        self.components.get(multi_word).map(Vec::as_slice)
    }

    /// Multi-word names that list `component` as one of their components.
    pub fn parents_of(&self, component: &str) -> &[String] {
        self.parents.get(component).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `component` belongs to a multi-word name found in `detected`.
    pub fn is_shadowed_by(&self, component: &str, detected: &HashSet<String>) -> bool {
        self.parents_of(component)
            .iter()
            .any(|parent| detected.contains(parent))
    }

    /// Number of multi-word names with at least one component.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
