//! Error types for the annotation pipeline
//!
//! Each external capability gets its own error enum so adapters can be swapped
//! without touching the pipeline. Only [`PipelineError`] crosses the public
//! `parse_article` boundary.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Configuration problems, raised before any article is processed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable '{name}'")]
    MissingVar { name: &'static str },

    #[error("Invalid value '{value}' for '{name}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid rule table: {0}")]
    RuleTable(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dictionary: {0}")]
    Dictionary(#[from] vibrato::errors::VibratoError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Tokenizer failures. The pipeline absorbs these and renders the unit literally.
#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("Tokenizer unavailable: {0}")]
    Unavailable(String),
}

/// Translation backend failures. Fatal to the enclosing enrichment call.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Translation timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Expected {expected} translations, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("Translation service error: {0}")]
    Service(String),
}

/// Vocabulary service failures. Absorbed at the boundary as an absent gate.
#[derive(Error, Debug)]
pub enum VocabularyFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to get {url}, got code {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid vocabulary URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Vocabulary service error: {0}")]
    Service(String),
}

/// Which unit of an article an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnitId {
    Title,
    Body(usize),
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Title => write!(f, "title"),
            UnitId::Body(index) => write!(f, "sentence {}", index),
        }
    }
}

/// A single unit whose translation failed
#[derive(Debug)]
pub struct UnitFailure {
    pub unit: UnitId,
    pub error: TranslationError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.unit, self.error)
    }
}

/// Aggregate failure of an enrichment call
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Translation failed for {} unit(s): {}", .failures.len(), join_failures(.failures))]
    Translation { failures: Vec<UnitFailure> },

    #[error("Batched translation of {units} unit(s) failed: {error}")]
    BatchTranslation {
        units: usize,
        error: TranslationError,
    },

    #[error("Enrichment worker failed: {0}")]
    Worker(String),
}

impl PipelineError {
    /// Units that failed, in article order
    pub fn failed_units(&self) -> Vec<UnitId> {
        match self {
            PipelineError::Translation { failures } => failures.iter().map(|f| f.unit).collect(),
            PipelineError::BatchTranslation { units, .. } => {
                (0..*units).map(UnitId::Body).collect()
            }
            PipelineError::Worker(_) => Vec::new(),
        }
    }
}

fn join_failures(failures: &[UnitFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
