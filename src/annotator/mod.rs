//! Token annotator
//!
//! Decides, token by token, whether to wrap the surface text in a dictionary
//! lookup link with its reading attached, and renders the result as HTML.
//!
//! Decision order for each token:
//! 1. The first enabled rule of the [`RuleTable`] that matches the token's
//!    part of speech yields a lookup key and a [`LinkCategory`].
//! 2. If a vocabulary gate is present, known words are suppressed: tokens with
//!    no lemma, lemmas in the gate, and bound forms (suffixes, counters) whose
//!    combining-marker key is in the gate.
//!
//! Annotation never changes visible text; see [`strip_markup`].

mod render;
pub mod rules;

use std::sync::Arc;

pub use render::strip_markup;
pub use rules::{KeySource, LinkCategory, PosMatch, Rule, RuleTable};

use crate::gate::VocabularyGate;
use crate::token::Token;

/// A lookup link chosen for one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub key: String,
    pub category: LinkCategory,
}

/// Decide the link for a single token, or `None` to render it literally.
pub fn classify(token: &Token, gate: &VocabularyGate, rules: &RuleTable) -> Option<Link> {
    let rule = rules.first_match(token)?;
    let stripped = token.lemma.as_deref().map(|l| rules.strip_variant(l));

    if let Some(lemma) = stripped {
        if rule.excluded_lemmas.iter().any(|e| e == lemma) {
            return None;
        }
    }

    let key = match rule.key {
        KeySource::Surface => token.surface.as_str(),
        KeySource::Lemma => stripped?,
    };
    if key.is_empty() {
        return None;
    }

    if !gate.is_absent() && is_suppressed(token, stripped, rule.category, gate, rules) {
        return None;
    }

    Some(Link {
        key: key.to_string(),
        category: rule.category,
    })
}

fn is_suppressed(
    token: &Token,
    stripped: Option<&str>,
    category: LinkCategory,
    gate: &VocabularyGate,
    rules: &RuleTable,
) -> bool {
    // Without a lemma the word cannot be checked against the gate
    let Some(lemma) = stripped else {
        return true;
    };
    if gate.contains(lemma) {
        return true;
    }

    let bound_form =
        category == LinkCategory::Suffix || token.pos.tertiary == rules.counter_capable;
    bound_form && gate.contains(&rules.combining_key(lemma))
}

/// Render one token: linked with its reading, or bare surface text.
pub fn render_token(token: &Token, gate: &VocabularyGate, rules: &RuleTable) -> String {
    match classify(token, gate, rules) {
        Some(link) => {
            let href = format!(
                "{}{}{}",
                rules.dictionary_base,
                link.key,
                link.category.fragment()
            );
            render::render_link(
                &href,
                &token.surface,
                token.pronunciation.as_deref().unwrap_or(""),
            )
        }
        None => render::escape_html(&token.surface),
    }
}

/// Annotate a token sequence. Tokens are concatenated in order with nothing
/// inserted between them.
///
/// The output is HTML: unlinked surfaces are escaped too, so compare it with
/// source text through [`strip_markup`], not byte for byte.
pub fn annotate(tokens: &[Token], gate: &VocabularyGate, rules: &RuleTable) -> String {
    tokens
        .iter()
        .map(|token| render_token(token, gate, rules))
        .collect()
}

/// Rendering used when a unit could not be tokenized: the raw text, unlinked.
pub fn annotate_literal(text: &str) -> String {
    render::escape_html(text)
}

/// Annotator bound to a shared rule table
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    rules: Arc<RuleTable>,
}

impl Annotator {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn annotate(&self, tokens: &[Token], gate: &VocabularyGate) -> String {
        annotate(tokens, gate, &self.rules)
    }
}
