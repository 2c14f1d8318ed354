use std::collections::HashMap;

use crate::normalize::normalize_words;

/// Static synonym table over canonical (normalized-words) keys.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// Build from display-name pairs; both sides are normalized.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(from, to)| (normalize_words(from), normalize_words(to)))
            .filter(|(from, to)| from != to)
            .collect();
        Self { map }
    }

    /// Canonical bucket key for a display name.
    pub fn canonical_key(&self, name: &str) -> String {
        let key = normalize_words(name);
        match self.map.get(&key) {
            Some(target) => target.clone(),
            None => key,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
