//! News Annotator - reading aids for Japanese news articles
//!
//! Turns an article into learner-friendly HTML: every content word the reader
//! does not yet know becomes a dictionary lookup link with its reading, and
//! every sentence is paired with a machine translation.
//!
//! ## Flow
//! Article -> Segment body -> (Tokenize -> Annotate) + Translate per sentence -> ParsedArticle
//!
//! The morphological analyser, the translation backend and the vocabulary
//! service are external collaborators behind [`Tokenizer`], [`Translator`] and
//! [`VocabularySource`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use news_annotator::{
//!     Article, ArticleParser, CloudTranslateClient, EnrichmentPipeline, PipelineConfig,
//!     TranslatorConfig, UnidicTokenizer, VocabularyGate,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let translator = CloudTranslateClient::new(&TranslatorConfig::from_env()?)?;
//! let tokenizer = UnidicTokenizer::load("/usr/share/unidic/system.dic")?;
//! let pipeline = EnrichmentPipeline::new(
//!     Arc::new(tokenizer),
//!     Arc::new(translator),
//!     PipelineConfig::default(),
//! )?;
//! let parser = ArticleParser::new(pipeline);
//!
//! let article = Article::new("天気", "今日は雨が降る。");
//! let parsed = parser
//!     .parse_article(Some(&article), Arc::new(VocabularyGate::Absent))
//!     .await?;
//! println!("{}", parsed.body[0].annotated);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Text model and vocabulary
pub mod gate;
pub mod token;

// Annotation
pub mod annotator;
pub mod segmenter;

// External collaborators
pub mod tokenizer;
pub mod translate;
pub mod vocabulary;

// Orchestration
pub mod article;
pub mod config;
pub mod pipeline;

#[cfg(test)]
mod test_support;

pub use annotator::{annotate, classify, strip_markup, Annotator, LinkCategory, RuleTable};
pub use article::{Article, ArticleParser, ParsedArticle};
pub use config::{Concurrency, PipelineConfig, TranslationMode, TranslatorConfig, VocabularyConfig};
pub use error::{
    ConfigError, PipelineError, TokenizeError, TranslationError, UnitFailure, UnitId,
    VocabularyFetchError,
};
pub use gate::VocabularyGate;
pub use pipeline::{EnrichmentPipeline, ParsedUnit};
pub use segmenter::segment;
pub use token::{PosTag, Token};
pub use tokenizer::{Tokenizer, UnidicTokenizer};
pub use translate::{CloudTranslateClient, Translator};
pub use vocabulary::{fetch_gate, gate_from_config, VocabularySource, WaniKaniClient};
