//! The banned-word set: words explicitly flagged `WF_BANNED` are never
//! suggested even though they otherwise match the trie walk.
//!
//! Uses an `ahash`-backed hash set rather than `std::HashSet`, matching
//! the rest of this crate's small string-keyed lookups.
use ahash::AHashSet;

/// A simple membership set over banned words, queried by the walk before a
/// candidate is inserted into the suggestion store.
#[derive(Debug, Clone, Default)]
pub struct BannedSet {
    words: AHashSet<String>,
}

impl BannedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words(words: impl IntoIterator<Item = String>) -> Self {
        BannedSet {
            words: words.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_exact_match() {
        let mut set = BannedSet::new();
        set.insert("badword");
        assert!(set.contains("badword"));
        assert!(!set.contains("Badword"));
        assert!(!set.contains("badwords"));
    }

    #[test]
    fn from_words_builds_set() {
        let set = BannedSet::from_words(["a".to_string(), "b".to_string()]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
    }
}
