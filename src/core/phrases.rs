//! Local phrase table used to answer very common inputs without a remote call

use std::collections::HashMap;

/// Built-in entries. `ne` and `na` both map to "No" even though `na` also
/// works as a context-dependent negation suffix in longer sentences.
const DEFAULT_PHRASES: &[(&str, &str)] = &[
    ("sthuthi", "Thank you"),
    ("ayubowan", "Hello"),
    ("hari", "Yes/Okay"),
    ("ne", "No"),
    ("na", "No"),
];

/// Read-only mapping from normalized phrases to English
#[derive(Debug, Clone)]
pub struct LocalPhraseTable {
    entries: HashMap<String, String>,
}

impl Default for LocalPhraseTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_PHRASES.iter().copied())
    }
}

impl LocalPhraseTable {
    /// Build a table from arbitrary pairs; keys are normalized on insert
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (normalize(k), v.to_string()))
            .collect();
        Self { entries }
    }

    /// An empty table, every lookup misses
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.entries.get(&normalize(text)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
