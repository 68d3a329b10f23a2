//! Annotation rule tables.
//!
//! A rule table is an ordered list of part-of-speech predicates, each mapping a
//! matching token to a lookup key and a link category. Revisions of the rule
//! set differ only in data, so they can be shipped as YAML rather than code.
//!
//! Category names are UniDic part-of-speech labels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::token::Token;

pub const NOUN: &str = "名詞";
pub const NUMERAL: &str = "数詞";
pub const NOUN_LIKE: &str = "名詞的";
pub const COUNTER: &str = "助数詞";
pub const COUNTER_CAPABLE: &str = "助数詞可能";
pub const VERB: &str = "動詞";
pub const ADJECTIVE: &str = "形容詞";
pub const NA_ADJECTIVE: &str = "形状詞";
pub const ADVERB: &str = "副詞";
pub const SUFFIX: &str = "接尾辞";

/// Verbs too common to be worth a lookup: いる, する, 行く, ある
pub const COMMON_VERBS: [&str; 4] = ["居る", "為る", "行く", "有る"];

pub const DEFAULT_DICTIONARY_BASE: &str = "https://jisho.org/search/";

/// Separator between a UniDic lemma and its disambiguating variant gloss
/// (e.g. `ダイエット-diet`)
pub const DEFAULT_VARIANT_SEPARATOR: char = '-';

/// Prefix used by vocabulary lists for bound forms such as suffixes and counters
pub const DEFAULT_COMBINING_MARKER: &str = "〜";

/// Dictionary category of a link; selects the anchor on the lookup page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Suffix,
}

impl LinkCategory {
    /// URL fragment appended to the lookup reference
    pub fn fragment(&self) -> &'static str {
        match self {
            LinkCategory::Noun => "",
            LinkCategory::Verb => "#verb",
            LinkCategory::Adjective => "#adjective",
            LinkCategory::Adverb => "#adv",
            LinkCategory::Suffix => "#suf",
        }
    }
}

/// Where a rule takes its lookup key from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Surface,
    /// Lemma with any variant gloss stripped
    Lemma,
}

/// Part-of-speech predicate. Empty lists place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosMatch {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub tertiary: Vec<String>,
    pub not_primary: Vec<String>,
    pub not_secondary: Vec<String>,
    pub not_tertiary: Vec<String>,
}

impl PosMatch {
    pub fn matches(&self, token: &Token) -> bool {
        let pos = &token.pos;
        one_of(&self.primary, &pos.primary)
            && one_of(&self.secondary, &pos.secondary)
            && one_of(&self.tertiary, &pos.tertiary)
            && none_of(&self.not_primary, &pos.primary)
            && none_of(&self.not_secondary, &pos.secondary)
            && none_of(&self.not_tertiary, &pos.tertiary)
    }
}

fn one_of(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

fn none_of(denied: &[String], value: &str) -> bool {
    !denied.iter().any(|d| d == value)
}

/// One row of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(rename = "match")]
    pub pos: PosMatch,
    pub key: KeySource,
    pub category: LinkCategory,
    /// Stripped lemmas this rule never links
    #[serde(default)]
    pub excluded_lemmas: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    fn new(name: &str, pos: PosMatch, key: KeySource, category: LinkCategory) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            pos,
            key,
            category,
            excluded_lemmas: Vec::new(),
        }
    }
}

/// Ordered rule set plus the lexical conventions it relies on.
///
/// The first enabled rule whose predicate matches a token decides its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    pub revision: String,
    #[serde(default = "default_dictionary_base")]
    pub dictionary_base: String,
    #[serde(default = "default_variant_separator")]
    pub variant_separator: char,
    #[serde(default = "default_combining_marker")]
    pub combining_marker: String,
    /// Tertiary category of nouns that can act as counters
    #[serde(default = "default_counter_capable")]
    pub counter_capable: String,
    pub rules: Vec<Rule>,
}

fn default_dictionary_base() -> String {
    DEFAULT_DICTIONARY_BASE.to_string()
}

fn default_variant_separator() -> char {
    DEFAULT_VARIANT_SEPARATOR
}

fn default_combining_marker() -> String {
    DEFAULT_COMBINING_MARKER.to_string()
}

fn default_counter_capable() -> String {
    COUNTER_CAPABLE.to_string()
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::current()
    }
}

impl RuleTable {
    /// Current revision: the quasi-nominal rule is present but disabled.
    pub fn current() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut verb = Rule::new(
            "verb",
            PosMatch {
                primary: strings(&[VERB]),
                ..Default::default()
            },
            KeySource::Lemma,
            LinkCategory::Verb,
        );
        verb.excluded_lemmas = strings(&COMMON_VERBS);

        let mut quasi_nominal = Rule::new(
            "quasi_nominal",
            PosMatch {
                secondary: strings(&[NOUN_LIKE]),
                not_tertiary: strings(&[COUNTER]),
                ..Default::default()
            },
            KeySource::Surface,
            LinkCategory::Noun,
        );
        quasi_nominal.enabled = false;

        Self {
            revision: "current".to_string(),
            dictionary_base: default_dictionary_base(),
            variant_separator: DEFAULT_VARIANT_SEPARATOR,
            combining_marker: default_combining_marker(),
            counter_capable: default_counter_capable(),
            rules: vec![
                Rule::new(
                    "common_noun",
                    PosMatch {
                        primary: strings(&[NOUN]),
                        not_secondary: strings(&[NUMERAL]),
                        not_tertiary: strings(&[COUNTER_CAPABLE]),
                        ..Default::default()
                    },
                    KeySource::Surface,
                    LinkCategory::Noun,
                ),
                quasi_nominal,
                verb,
                Rule::new(
                    "adjective",
                    PosMatch {
                        primary: strings(&[ADJECTIVE, NA_ADJECTIVE]),
                        ..Default::default()
                    },
                    KeySource::Lemma,
                    LinkCategory::Adjective,
                ),
                Rule::new(
                    "adverb",
                    PosMatch {
                        primary: strings(&[ADVERB]),
                        ..Default::default()
                    },
                    KeySource::Lemma,
                    LinkCategory::Adverb,
                ),
                Rule::new(
                    "suffix",
                    PosMatch {
                        primary: strings(&[SUFFIX]),
                        ..Default::default()
                    },
                    KeySource::Lemma,
                    LinkCategory::Suffix,
                ),
            ],
        }
    }

    /// Earlier revision with the quasi-nominal rule switched on
    pub fn legacy() -> Self {
        let mut table = Self::current();
        table.revision = "legacy".to_string();
        table.set_enabled("quasi_nominal", true);
        table
    }

    /// Toggle a rule by name. Returns false if no rule has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// First enabled rule matching the token
    pub fn first_match(&self, token: &Token) -> Option<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .find(|r| r.pos.matches(token))
    }

    /// Lemma with the variant gloss removed (`ダイエット-diet` → `ダイエット`)
    pub fn strip_variant<'a>(&self, lemma: &'a str) -> &'a str {
        lemma
            .split(self.variant_separator)
            .next()
            .unwrap_or(lemma)
    }

    /// Vocabulary key for the bound form of a lemma (`人` → `〜人`)
    pub fn combining_key(&self, stripped_lemma: &str) -> String {
        format!("{}{}", self.combining_marker, stripped_lemma)
    }
}
