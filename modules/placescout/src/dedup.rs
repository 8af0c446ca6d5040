use std::collections::HashSet;
use std::sync::Mutex;

/// Process-wide set of committed place identities.
///
/// Consulted before a listing is extracted and updated only after the record
/// is fully built, so a failed extraction never poisons the set. The lock
/// keeps check-then-insert atomic if extraction is ever run concurrently.
#[derive(Debug, Default)]
pub struct DedupIndex {
    names: Mutex<HashSet<String>>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.lock().expect("dedup lock").contains(name)
    }

    /// Returns false when the name was already committed.
    pub fn insert(&self, name: &str) -> bool {
        self.names
            .lock()
            .expect("dedup lock")
            .insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.lock().expect("dedup lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let index = DedupIndex::new();
        assert!(!index.contains("Bait Al Mandi"));
        assert!(index.insert("Bait Al Mandi"));
        assert!(index.contains("Bait Al Mandi"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn double_insert_reports_duplicate() {
        let index = DedupIndex::new();
        assert!(index.insert("Ravioli House"));
        assert!(!index.insert("Ravioli House"));
        assert_eq!(index.len(), 1);
    }
}
