//! Translator capability
//!
//! Maps source text to target-language text. Implementations are long-lived
//! clients shared by every enrichment task of an article.

pub mod cloud;

pub use cloud::CloudTranslateClient;

use async_trait::async_trait;

use crate::error::TranslationError;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single text.
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<String, TranslationError>;

    /// Translate several texts, returning results in input order.
    ///
    /// The default issues one request per text; backends with a native batch
    /// endpoint should override it.
    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let mut translations = Vec::with_capacity(texts.len());
        for text in texts {
            translations.push(self.translate(text, target_language).await?);
        }
        Ok(translations)
    }
}
