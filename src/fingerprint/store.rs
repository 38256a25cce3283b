// src/fingerprint/store.rs

use std::collections::BTreeMap;

use tracing::debug;

use super::hash::Fingerprint;

/// Output file name -> fingerprint for one build.
///
/// A `BTreeMap` keeps enumeration (and therefore the changed-file list)
/// stable across runs.
pub type FingerprintMap = BTreeMap<String, Fingerprint>;

/// Fingerprints of the most recent successful build.
///
/// Owned by exactly one lifecycle controller. After a failed build the store
/// is emptied so the next successful build reports every file as changed.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    last: FingerprintMap,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names in `next` whose fingerprint differs from the stored one.
    ///
    /// A name missing from the store counts as changed. Files that were in
    /// the previous build but are gone from `next` are not reported.
    pub fn changed_files(&self, next: &FingerprintMap) -> Vec<String> {
        next.iter()
            .filter(|(name, fingerprint)| self.last.get(name.as_str()) != Some(*fingerprint))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Replace the stored map wholesale.
    pub fn replace(&mut self, next: FingerprintMap) {
        debug!(
            previous = self.last.len(),
            next = next.len(),
            "replacing fingerprint baseline"
        );
        self.last = next;
    }

    /// Forget every fingerprint.
    pub fn clear(&mut self) {
        if !self.last.is_empty() {
            debug!(cleared = self.last.len(), "cleared fingerprint baseline");
        }
        self.last.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Fingerprint> {
        self.last.get(name)
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> FingerprintMap {
        entries
            .iter()
            .map(|(name, content)| (name.to_string(), Fingerprint::of_bytes(content.as_bytes())))
            .collect()
    }

    #[test]
    fn empty_store_reports_everything() {
        let store = FingerprintStore::new();
        let next = map(&[("a.js", "1"), ("b.js", "2")]);
        assert_eq!(store.changed_files(&next), vec!["a.js", "b.js"]);
    }

    #[test]
    fn reports_changed_and_new_but_not_unchanged() {
        let mut store = FingerprintStore::new();
        store.replace(map(&[("a", "h1"), ("b", "h2")]));

        let next = map(&[("a", "h1"), ("b", "h3"), ("c", "h4")]);
        assert_eq!(store.changed_files(&next), vec!["b", "c"]);
    }

    #[test]
    fn removed_files_are_not_reported() {
        let mut store = FingerprintStore::new();
        store.replace(map(&[("a", "1"), ("old", "2")]));

        let next = map(&[("a", "1")]);
        assert!(store.changed_files(&next).is_empty());
    }

    #[test]
    fn clear_empties_the_baseline() {
        let mut store = FingerprintStore::new();
        store.replace(map(&[("a", "1")]));
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_some());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.changed_files(&map(&[("a", "1")])), vec!["a"]);
    }
}
