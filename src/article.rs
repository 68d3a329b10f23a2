//! Article parser
//!
//! Orchestrates one article: segment the body, enrich the title inline, enrich
//! the body sentences through the worker pool, and return both. Any translation
//! failure fails the whole article; there are no partial results.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PipelineError, UnitFailure, UnitId};
use crate::gate::VocabularyGate;
use crate::pipeline::{EnrichmentPipeline, ParsedUnit};
use crate::segmenter::segment;

/// A news article as delivered by the news source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub body: String,
}

impl Article {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }
}

/// Annotated title and body of one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub title: ParsedUnit,
    pub body: Vec<ParsedUnit>,
}

impl ParsedArticle {
    /// Title sentinel plus a single body sentinel
    pub fn empty() -> Self {
        Self {
            title: ParsedUnit::empty(),
            body: vec![ParsedUnit::empty()],
        }
    }

    /// True for the "no content" result
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.iter().all(ParsedUnit::is_empty)
    }
}

pub struct ArticleParser {
    pipeline: EnrichmentPipeline,
}

impl ArticleParser {
    pub fn new(pipeline: EnrichmentPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &EnrichmentPipeline {
        &self.pipeline
    }

    /// Parse an article against a reader's vocabulary gate.
    ///
    /// An absent or empty article yields [`ParsedArticle::empty`]. An empty
    /// title or a body with no sentences yields the sentinel in that position.
    pub async fn parse_article(
        &self,
        article: Option<&Article>,
        gate: Arc<VocabularyGate>,
    ) -> Result<ParsedArticle, PipelineError> {
        let article = match article {
            Some(article) if !article.is_empty() => article,
            _ => return Ok(ParsedArticle::empty()),
        };

        let sentences = segment(&article.body);

        info!(
            sentences = sentences.len(),
            gate_size = ?gate.known_count(),
            "parsing article"
        );

        let title = if article.title.is_empty() {
            ParsedUnit::empty()
        } else {
            self.pipeline
                .enrich_one(&article.title, &gate)
                .await
                .map_err(|error| PipelineError::Translation {
                    failures: vec![UnitFailure {
                        unit: UnitId::Title,
                        error,
                    }],
                })?
        };

        let body = if sentences.is_empty() {
            vec![ParsedUnit::empty()]
        } else {
            self.pipeline.enrich(sentences, gate).await?
        };

        Ok(ParsedArticle { title, body })
    }
}
