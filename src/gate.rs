//! Vocabulary gate: the set of lemmas a reader already knows.
//!
//! `Absent` and an empty `Known` set are different things. `Absent` switches
//! suppression off entirely (the vocabulary service was unreachable or never
//! configured); an empty set means the reader knows nothing yet, which still
//! enables the null-lemma rule.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VocabularyGate {
    #[default]
    Absent,
    Known(HashSet<String>),
}

impl VocabularyGate {
    /// Gate with no known words (suppression enabled)
    pub fn empty() -> Self {
        VocabularyGate::Known(HashSet::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, VocabularyGate::Absent)
    }

    /// Membership test. Always false for an absent gate.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            VocabularyGate::Absent => false,
            VocabularyGate::Known(words) => words.contains(key),
        }
    }

    /// Number of known words; `None` when the gate is absent
    pub fn known_count(&self) -> Option<usize> {
        match self {
            VocabularyGate::Absent => None,
            VocabularyGate::Known(words) => Some(words.len()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for VocabularyGate {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        VocabularyGate::Known(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Option<HashSet<String>>> for VocabularyGate {
    fn from(words: Option<HashSet<String>>) -> Self {
        match words {
            Some(words) => VocabularyGate::Known(words),
            None => VocabularyGate::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let absent = VocabularyGate::Absent;
        let empty = VocabularyGate::empty();

        assert_ne!(absent, empty);
        assert!(absent.is_absent());
        assert!(!empty.is_absent());
        assert_eq!(absent.known_count(), None);
        assert_eq!(empty.known_count(), Some(0));
    }

    #[test]
    fn test_contains() {
        let gate: VocabularyGate = ["食べる", "〜人"].into_iter().collect();
        assert!(gate.contains("食べる"));
        assert!(gate.contains("〜人"));
        assert!(!gate.contains("飲む"));
        assert!(!VocabularyGate::Absent.contains("食べる"));
    }
}
