//! Morphological tokens as produced by a tokenizer adapter.

use serde::{Deserialize, Serialize};

/// Hierarchical part-of-speech tag, coarse to fine.
///
/// Empty strings mean the analyser did not assign that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTag {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

impl PosTag {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        tertiary: impl Into<String>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            tertiary: tertiary.into(),
        }
    }
}

/// One morphological unit of a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Exact span of source text
    pub surface: String,
    pub pos: PosTag,
    /// Canonical dictionary form, when the analyser knows it
    pub lemma: Option<String>,
    /// Reading, when the analyser knows it
    pub pronunciation: Option<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>, pos: PosTag) -> Self {
        Self {
            surface: surface.into(),
            pos,
            lemma: None,
            pronunciation: None,
        }
    }

    /// A token with no grammatical information; never linked.
    pub fn literal(surface: impl Into<String>) -> Self {
        Self::new(surface, PosTag::default())
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }
}
