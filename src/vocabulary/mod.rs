//! Known-vocabulary sources
//!
//! The gate is built once per reader from an external progress service. Any
//! failure to fetch it degrades to an absent gate, so an outage of that service
//! means unfiltered annotation rather than no article.

pub mod wanikani;

pub use wanikani::WaniKaniClient;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::VocabularyConfig;
use crate::error::VocabularyFetchError;
use crate::gate::VocabularyGate;

#[async_trait]
pub trait VocabularySource: Send + Sync {
    /// Lemmas the reader already knows
    async fn fetch_known(&self) -> Result<HashSet<String>, VocabularyFetchError>;
}

/// Fetch the gate, failing open to [`VocabularyGate::Absent`].
pub async fn fetch_gate(source: &dyn VocabularySource) -> VocabularyGate {
    match source.fetch_known().await {
        Ok(words) => {
            info!(known = words.len(), "vocabulary gate loaded");
            VocabularyGate::Known(words)
        }
        Err(e) => {
            warn!("Failed to get known vocabulary, annotating everything: {}", e);
            VocabularyGate::Absent
        }
    }
}

/// Build the gate for a reader from the configured vocabulary service.
///
/// No token means no service: the gate is absent and nothing is requested.
pub async fn gate_from_config(config: &VocabularyConfig) -> VocabularyGate {
    match WaniKaniClient::from_config(config) {
        Ok(Some(client)) => fetch_gate(&client).await,
        Ok(None) => {
            info!("no vocabulary token configured, annotating everything");
            VocabularyGate::Absent
        }
        Err(e) => {
            warn!("Vocabulary client unavailable, annotating everything: {}", e);
            VocabularyGate::Absent
        }
    }
}

/// Gate from a plain word list, one lemma per line. Blank lines and `#`
/// comments are ignored.
pub fn gate_from_word_list(list: &str) -> VocabularyGate {
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
