use serde::{Deserialize, Serialize};

/// One enriched sentence or title.
///
/// The all-empty value is the "no content" sentinel returned for absent or
/// empty articles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Source text
    pub raw: String,
    /// Source text with lookup links and readings (HTML)
    pub annotated: String,
    pub translation: String,
}

impl ParsedUnit {
    /// The "no content" sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.annotated.is_empty() && self.translation.is_empty()
    }
}
