//! Enrichment pipeline
//!
//! Pairs each text unit with its annotation and its translation. Body
//! sentences run on a bounded worker pool owned by a single [`EnrichmentPipeline::enrich`]
//! call; results are placed by input index, so completion order never leaks
//! into the output.
//!
//! Failure model:
//! - tokenizer failure: the unit is rendered literally and processing continues
//! - translator failure or timeout: outstanding sibling tasks are cancelled and
//!   the call fails with every failed unit named

mod unit;

pub use unit::ParsedUnit;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::annotator::{annotate_literal, Annotator, RuleTable};
use crate::config::{Concurrency, PipelineConfig, TranslationMode};
use crate::error::{ConfigError, PipelineError, TranslationError, UnitFailure, UnitId};
use crate::gate::VocabularyGate;
use crate::tokenizer::Tokenizer;
use crate::translate::Translator;

/// Everything one task needs to enrich a unit. Cheap to clone into tasks.
#[derive(Clone)]
struct UnitEnricher {
    tokenizer: Arc<dyn Tokenizer>,
    translator: Arc<dyn Translator>,
    annotator: Annotator,
    target_language: Arc<str>,
    timeout: Duration,
}

impl UnitEnricher {
    /// Tokenize and annotate on the blocking pool; falls back to literal text.
    async fn annotate(&self, text: &str, gate: &Arc<VocabularyGate>) -> String {
        let tokenizer = Arc::clone(&self.tokenizer);
        let annotator = self.annotator.clone();
        let gate = Arc::clone(gate);
        let owned = text.to_string();

        let result = tokio::task::spawn_blocking(move || {
            tokenizer
                .tokenize(&owned)
                .map(|tokens| annotator.annotate(&tokens, &gate))
        })
        .await;

        match result {
            Ok(Ok(annotated)) => annotated,
            Ok(Err(e)) => {
                warn!("Tokenization failed, rendering unit literally: {}", e);
                annotate_literal(text)
            }
            Err(e) => {
                warn!("Tokenizer task failed, rendering unit literally: {}", e);
                annotate_literal(text)
            }
        }
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        tokio::time::timeout(
            self.timeout,
            self.translator.translate(text, &self.target_language),
        )
        .await
        .unwrap_or(Err(TranslationError::Timeout {
            after: self.timeout,
        }))
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        let translations = tokio::time::timeout(
            self.timeout,
            self.translator.translate_batch(texts, &self.target_language),
        )
        .await
        .unwrap_or(Err(TranslationError::Timeout {
            after: self.timeout,
        }))?;

        if translations.len() != texts.len() {
            return Err(TranslationError::CountMismatch {
                expected: texts.len(),
                got: translations.len(),
            });
        }
        Ok(translations)
    }

    async fn enrich(
        &self,
        text: String,
        gate: &Arc<VocabularyGate>,
    ) -> Result<ParsedUnit, TranslationError> {
        let (annotated, translation) =
            tokio::join!(self.annotate(&text, gate), self.translate(&text));
        Ok(ParsedUnit {
            raw: text,
            annotated,
            translation: translation?,
        })
    }
}

/// Annotation and translation of text units
pub struct EnrichmentPipeline {
    enricher: UnitEnricher,
    workers: usize,
    concurrency: Concurrency,
    translation_mode: TranslationMode,
}

impl EnrichmentPipeline {
    /// Build a pipeline around long-lived tokenizer and translator handles.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        translator: Arc<dyn Translator>,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            enricher: UnitEnricher {
                tokenizer,
                translator,
                annotator: Annotator::new(config.rules),
                target_language: Arc::from(config.target_language.as_str()),
                timeout: config.translation_timeout,
            },
            workers: config.workers,
            concurrency: config.concurrency,
            translation_mode: config.translation_mode,
        })
    }

    pub fn rules(&self) -> &RuleTable {
        self.enricher.annotator.rules()
    }

    /// Enrich one unit inline, without the worker pool.
    pub async fn enrich_one(
        &self,
        text: &str,
        gate: &Arc<VocabularyGate>,
    ) -> Result<ParsedUnit, TranslationError> {
        self.enricher.enrich(text.to_string(), gate).await
    }

    /// Enrich every unit. Output has one [`ParsedUnit`] per input, in input order.
    pub async fn enrich(
        &self,
        units: Vec<String>,
        gate: Arc<VocabularyGate>,
    ) -> Result<Vec<ParsedUnit>, PipelineError> {
        if units.is_empty() {
            return Ok(Vec::new());
        }

        match (self.translation_mode, self.concurrency) {
            (TranslationMode::PerUnit, Concurrency::Parallel) => {
                self.enrich_parallel(units, gate).await
            }
            (TranslationMode::PerUnit, Concurrency::Sequential) => {
                self.enrich_sequential(units, gate).await
            }
            (TranslationMode::Batched, _) => self.enrich_batched(units, gate).await,
        }
    }

    async fn enrich_parallel(
        &self,
        units: Vec<String>,
        gate: Arc<VocabularyGate>,
    ) -> Result<Vec<ParsedUnit>, PipelineError> {
        let total = units.len();
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        info!(sentences = total, workers = self.workers, "enriching body");

        for (index, text) in units.into_iter().enumerate() {
            let enricher = self.enricher.clone();
            let gate = Arc::clone(&gate);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed; a failed acquire would only drop the bound
                let _permit = permits.acquire_owned().await.ok();
                (index, enricher.enrich(text, &gate).await)
            });
        }

        let mut slots: Vec<Option<ParsedUnit>> = (0..total).map(|_| None).collect();
        let mut failures = Vec::new();
        let mut completed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(unit))) => {
                    completed += 1;
                    debug!("{}/{}\tParsed: {}", completed, total, unit.raw);
                    slots[index] = Some(unit);
                }
                Ok((index, Err(error))) => {
                    if failures.is_empty() {
                        warn!(
                            "Translation failed for sentence {}, cancelling the rest: {}",
                            index, error
                        );
                        tasks.abort_all();
                    }
                    failures.push(UnitFailure {
                        unit: UnitId::Body(index),
                        error,
                    });
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(PipelineError::Worker(e.to_string())),
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|f| f.unit);
            return Err(PipelineError::Translation { failures });
        }
        collect_slots(slots)
    }

    async fn enrich_sequential(
        &self,
        units: Vec<String>,
        gate: Arc<VocabularyGate>,
    ) -> Result<Vec<ParsedUnit>, PipelineError> {
        let total = units.len();
        let mut parsed = Vec::with_capacity(total);

        for (index, text) in units.into_iter().enumerate() {
            debug!("{:5.1}%\tParsing: {}", index as f64 * 100.0 / total as f64, text);
            let unit = self
                .enricher
                .enrich(text, &gate)
                .await
                .map_err(|error| PipelineError::Translation {
                    failures: vec![UnitFailure {
                        unit: UnitId::Body(index),
                        error,
                    }],
                })?;
            parsed.push(unit);
        }
        debug!("100%");

        Ok(parsed)
    }

    async fn enrich_batched(
        &self,
        units: Vec<String>,
        gate: Arc<VocabularyGate>,
    ) -> Result<Vec<ParsedUnit>, PipelineError> {
        info!(sentences = units.len(), "enriching body with one batched translation");

        let (annotations, translations) = tokio::join!(
            self.annotate_all(&units, &gate),
            self.enricher.translate_batch(&units)
        );
        let annotations = annotations?;
        let translations = translations.map_err(|error| PipelineError::BatchTranslation {
            units: units.len(),
            error,
        })?;

        Ok(units
            .into_iter()
            .zip(annotations)
            .zip(translations)
            .map(|((raw, annotated), translation)| ParsedUnit {
                raw,
                annotated,
                translation,
            })
            .collect())
    }

    async fn annotate_all(
        &self,
        units: &[String],
        gate: &Arc<VocabularyGate>,
    ) -> Result<Vec<String>, PipelineError> {
        if self.concurrency == Concurrency::Sequential {
            let mut annotations = Vec::with_capacity(units.len());
            for text in units {
                annotations.push(self.enricher.annotate(text, gate).await);
            }
            return Ok(annotations);
        }

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        for (index, text) in units.iter().cloned().enumerate() {
            let enricher = self.enricher.clone();
            let gate = Arc::clone(gate);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                (index, enricher.annotate(&text, &gate).await)
            });
        }

        let mut slots: Vec<Option<String>> = vec![None; units.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, annotated) = joined.map_err(|e| PipelineError::Worker(e.to_string()))?;
            slots[index] = Some(annotated);
        }
        collect_slots(slots)
    }
}

fn collect_slots<T>(slots: Vec<Option<T>>) -> Result<Vec<T>, PipelineError> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                PipelineError::Worker(format!("sentence {} produced no result", index))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenizeError;
    use crate::token::{PosTag, Token};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Every character is a common noun with itself as lemma
    struct CharNouns;

    impl Tokenizer for CharNouns {
        fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
            Ok(text
                .chars()
                .map(|c| {
                    Token::new(c.to_string(), PosTag::new("名詞", "普通名詞", "一般"))
                        .with_lemma(c.to_string())
                })
                .collect())
        }
    }

    struct Broken;

    impl Tokenizer for Broken {
        fn tokenize(&self, _text: &str) -> Result<Vec<Token>, TokenizeError> {
            Err(TokenizeError::Unavailable("no dictionary".into()))
        }
    }

    /// Echoes input; fails on texts containing "fail"
    struct Echo {
        calls: AtomicUsize,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for Echo {
        async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("fail") {
                return Err(TranslationError::Service(format!("cannot translate {}", text)));
            }
            Ok(format!("[{}] {}", target, text))
        }
    }

    /// Fails on "fail" at once; every other unit stalls before echoing
    struct Stalling {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for Stalling {
        async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("fail") {
                return Err(TranslationError::Service("rejected".into()));
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(text.to_string())
        }
    }

    struct Slow;

    #[async_trait]
    impl Translator for Slow {
        async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(text.to_string())
        }
    }

    fn pipeline(
        tokenizer: Arc<dyn Tokenizer>,
        translator: Arc<dyn Translator>,
        config: PipelineConfig,
    ) -> EnrichmentPipeline {
        EnrichmentPipeline::new(tokenizer, translator, config).unwrap()
    }

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_enrich_one() {
        let p = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), PipelineConfig::default());
        let gate = Arc::new(VocabularyGate::Absent);
        let unit = p.enrich_one("雨。", &gate).await.unwrap();

        assert_eq!(unit.raw, "雨。");
        assert_eq!(unit.translation, "[en] 雨。");
        assert!(unit.annotated.contains("https://jisho.org/search/雨"));
    }

    #[tokio::test]
    async fn test_tokenizer_failure_falls_back_to_literal() {
        let p = pipeline(Arc::new(Broken), Arc::new(Echo::new()), PipelineConfig::default());
        let out = p
            .enrich(sentences(&["雨。"]), Arc::new(VocabularyGate::Absent))
            .await
            .unwrap();
        assert_eq!(out[0].annotated, "雨。");
        assert_eq!(out[0].translation, "[en] 雨。");
    }

    #[tokio::test]
    async fn test_empty_input_gives_empty_output() {
        let p = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), PipelineConfig::default());
        let out = p.enrich(Vec::new(), Arc::new(VocabularyGate::Absent)).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_parallel_failure_names_units() {
        let config = PipelineConfig {
            workers: 1,
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), config);
        let err = p
            .enrich(
                sentences(&["ok。", "fail。", "ok。"]),
                Arc::new(VocabularyGate::Absent),
            )
            .await
            .unwrap_err();

        let failed = err.failed_units();
        assert!(failed.contains(&UnitId::Body(1)));
        assert!(failed.iter().all(|u| *u == UnitId::Body(1)));
    }

    #[tokio::test]
    async fn test_failure_cancels_outstanding_units() {
        let translator = Arc::new(Stalling {
            calls: AtomicUsize::new(0),
        });
        let config = PipelineConfig {
            workers: 1,
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), translator.clone(), config);

        let mut units = sentences(&["fail。"]);
        units.extend((0..20).map(|i| format!("{}。", i)));
        let total = units.len();

        let err = p
            .enrich(units, Arc::new(VocabularyGate::Absent))
            .await
            .unwrap_err();

        assert_eq!(err.failed_units(), vec![UnitId::Body(0)]);
        let calls = translator.calls.load(Ordering::SeqCst);
        assert!(calls < total / 2, "{} of {} units were translated", calls, total);
    }

    #[tokio::test]
    async fn test_sequential_stops_at_first_failure() {
        let translator = Arc::new(Echo::new());
        let config = PipelineConfig {
            concurrency: Concurrency::Sequential,
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), translator.clone(), config);
        let err = p
            .enrich(
                sentences(&["a。", "fail。", "b。"]),
                Arc::new(VocabularyGate::Absent),
            )
            .await
            .unwrap_err();

        assert_eq!(err.failed_units(), vec![UnitId::Body(1)]);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_batched_mode_matches_per_unit() {
        let input = sentences(&["今日。", "雨。", "晴れ。"]);
        let gate = Arc::new(VocabularyGate::empty());

        let config = PipelineConfig::default();
        let per_unit = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), config)
            .enrich(input.clone(), Arc::clone(&gate))
            .await
            .unwrap();

        let config = PipelineConfig {
            translation_mode: TranslationMode::Batched,
            ..Default::default()
        };
        let batched = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), config)
            .enrich(input, gate)
            .await
            .unwrap();

        assert_eq!(per_unit, batched);
    }

    #[tokio::test]
    async fn test_batched_failure_covers_every_unit() {
        let config = PipelineConfig {
            translation_mode: TranslationMode::Batched,
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), config);
        let err = p
            .enrich(sentences(&["a。", "fail。"]), Arc::new(VocabularyGate::Absent))
            .await
            .unwrap_err();
        assert_eq!(err.failed_units(), vec![UnitId::Body(0), UnitId::Body(1)]);
    }

    #[tokio::test]
    async fn test_translation_timeout() {
        let config = PipelineConfig {
            translation_timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), Arc::new(Slow), config);
        let err = p
            .enrich(sentences(&["雨。"]), Arc::new(VocabularyGate::Absent))
            .await
            .unwrap_err();

        match err {
            PipelineError::Translation { failures } => {
                assert!(matches!(failures[0].error, TranslationError::Timeout { .. }));
            }
            other => panic!("Expected Translation error, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_annotates_with_configured_rules() {
        let config = PipelineConfig {
            rules: RuleTable::legacy(),
            ..Default::default()
        };
        let p = pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), config);
        assert_eq!(p.rules().revision, "legacy");
        assert_eq!(
            pipeline(Arc::new(CharNouns), Arc::new(Echo::new()), PipelineConfig::default())
                .rules()
                .revision,
            "current"
        );
    }

    #[test]
    fn test_zero_workers_is_config_error() {
        let config = PipelineConfig {
            workers: 0,
            ..Default::default()
        };
        let result = EnrichmentPipeline::new(Arc::new(CharNouns), Arc::new(Echo::new()), config);
        assert!(result.is_err());
    }
}
