//! Configuration for the pipeline and its external clients
//!
//! Values come from environment variables with defaults, the way the rest of
//! the service is configured. Missing credentials are reported as
//! [`ConfigError`] before any article is processed.

use std::time::Duration;

use crate::annotator::RuleTable;
use crate::error::ConfigError;

pub const DEFAULT_TRANSLATE_API_BASE: &str = "https://translation.googleapis.com/v3";
pub const DEFAULT_WANIKANI_API_BASE: &str = "https://api.wanikani.com/v2/";

fn var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    var(name).ok_or(ConfigError::MissingVar { name })
}

fn parsed_var<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            }),
    }
}

// =============================================================================
// Translator
// =============================================================================

/// Cloud Translation client configuration
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub project_id: String,
    pub access_token: String,
    pub api_base: String,
    /// `None` lets the service detect the source language
    pub source_language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            access_token: String::new(),
            api_base: DEFAULT_TRANSLATE_API_BASE.to_string(),
            source_language: Some("ja".to_string()),
            timeout_secs: 30,
        }
    }
}

impl TranslatorConfig {
    /// Reads `TRANSLATE_PROJECT_ID` and `TRANSLATE_ACCESS_TOKEN` (required),
    /// `TRANSLATE_API_BASE`, `TRANSLATE_SOURCE_LANGUAGE`, `TRANSLATE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            project_id: required_var("TRANSLATE_PROJECT_ID")?,
            access_token: required_var("TRANSLATE_ACCESS_TOKEN")?,
            api_base: var("TRANSLATE_API_BASE").unwrap_or(defaults.api_base),
            source_language: var("TRANSLATE_SOURCE_LANGUAGE").or(defaults.source_language),
            timeout_secs: parsed_var("TRANSLATE_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        })
    }
}

// =============================================================================
// Vocabulary service
// =============================================================================

#[derive(Debug, Clone)]
pub struct VocabularyConfig {
    /// Empty means no vocabulary service; annotation runs unfiltered
    pub api_token: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_base: DEFAULT_WANIKANI_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl VocabularyConfig {
    /// Reads `WK_TOKEN` and `WK_API_BASE`. Neither is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_token: var("WK_TOKEN").unwrap_or_default(),
            api_base: var("WK_API_BASE").unwrap_or(defaults.api_base),
            timeout_secs: parsed_var("WK_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        })
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// How body sentences are translated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslationMode {
    /// One translator call per sentence, inside each sentence's task
    #[default]
    PerUnit,
    /// A single batched translator call covering every sentence
    Batched,
}

/// How body sentences are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Concurrency {
    /// Bounded worker pool, one task per sentence
    #[default]
    Parallel,
    /// One sentence at a time
    Sequential,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Worker pool size for body sentences
    pub workers: usize,
    /// Bound on every translator call
    pub translation_timeout: Duration,
    pub translation_mode: TranslationMode,
    pub concurrency: Concurrency,
    pub target_language: String,
    pub rules: RuleTable,
}

/// Host parallelism, falling back to a single worker when unknown
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: available_workers(),
            translation_timeout: Duration::from_secs(30),
            translation_mode: TranslationMode::default(),
            concurrency: Concurrency::default(),
            target_language: "en".to_string(),
            rules: RuleTable::current(),
        }
    }
}

impl PipelineConfig {
    /// Reads `ANNOTATOR_WORKERS`, `ANNOTATOR_TRANSLATION_TIMEOUT_SECS` and
    /// `TRANSLATE_TARGET_LANGUAGE` over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            workers: parsed_var("ANNOTATOR_WORKERS")?.unwrap_or(defaults.workers),
            translation_timeout: parsed_var("ANNOTATOR_TRANSLATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.translation_timeout),
            target_language: var("TRANSLATE_TARGET_LANGUAGE").unwrap_or(defaults.target_language),
            ..defaults
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                name: "ANNOTATOR_WORKERS",
                value: "0".to_string(),
                reason: "worker pool needs at least one worker".to_string(),
            });
        }
        if self.target_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "TRANSLATE_TARGET_LANGUAGE",
                value: self.target_language.clone(),
                reason: "target language must not be empty".to_string(),
            });
        }
        if self.translation_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "ANNOTATOR_TRANSLATION_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.target_language, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                name: "ANNOTATOR_WORKERS",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_target_language_rejected() {
        let config = PipelineConfig {
            target_language: " ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
