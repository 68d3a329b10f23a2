//! Google Cloud Translation (v3) client
//!
//! Uses the REST `translateText` method. One request can carry several
//! contents, so batched translation is a single round trip.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Translator;
use crate::config::TranslatorConfig;
use crate::error::{ConfigError, TranslationError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateTextRequest<'a> {
    contents: &'a [String],
    target_language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_language_code: Option<&'a str>,
    mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateTextResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

pub struct CloudTranslateClient {
    client: Client,
    endpoint: String,
    access_token: String,
    source_language: Option<String>,
}

impl CloudTranslateClient {
    pub fn new(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        if config.project_id.trim().is_empty() {
            return Err(ConfigError::MissingVar {
                name: "TRANSLATE_PROJECT_ID",
            });
        }
        if config.access_token.trim().is_empty() {
            return Err(ConfigError::MissingVar {
                name: "TRANSLATE_ACCESS_TOKEN",
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/projects/{}:translateText",
                config.api_base.trim_end_matches('/'),
                config.project_id
            ),
            access_token: config.access_token.clone(),
            source_language: config.source_language.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(
        &self,
        contents: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let body = TranslateTextRequest {
            contents,
            target_language_code: target_language,
            source_language_code: self.source_language.as_deref(),
            mime_type: "text/plain",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: TranslateTextResponse = response.json().await?;
        if parsed.translations.len() != contents.len() {
            return Err(TranslationError::CountMismatch {
                expected: contents.len(),
                got: parsed.translations.len(),
            });
        }

        debug!(count = contents.len(), "translated batch");
        Ok(parsed
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect())
    }
}

#[async_trait]
impl Translator for CloudTranslateClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let mut translations = self.request(&[text.to_string()], target_language).await?;
        translations
            .pop()
            .ok_or(TranslationError::CountMismatch {
                expected: 1,
                got: 0,
            })
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts, target_language).await
    }
}
