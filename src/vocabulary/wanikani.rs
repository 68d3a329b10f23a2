//! WaniKani API client
//!
//! Known vocabulary is every vocabulary subject whose assignment has reached
//! the Guru stage or beyond (SRS stages 6–9). Collections are paginated through
//! `pages.next_url`.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::VocabularySource;
use crate::config::VocabularyConfig;
use crate::error::{ConfigError, VocabularyFetchError};

const VOCABULARY_SUBJECTS: &str = "subjects?types=vocabulary";
const GURU_AND_ABOVE_ASSIGNMENTS: &str = "assignments?subject_types=vocabulary&srs_stages=6,7,8,9";
const USER: &str = "user";

/// Paginated collection envelope
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    pub data: Vec<Resource<T>>,
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
pub struct Pages {
    pub next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Resource<T> {
    #[serde(default)]
    pub id: Option<u64>,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct SubjectData {
    /// Null for radicals drawn as images
    pub characters: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentData {
    pub subject_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub username: String,
}

/// Characters of the subjects referenced by `assignments`
pub fn known_characters(
    subjects: &[Resource<SubjectData>],
    assignments: &[Resource<AssignmentData>],
) -> HashSet<String> {
    let known_ids: HashSet<u64> = assignments.iter().map(|a| a.data.subject_id).collect();
    subjects
        .iter()
        .filter(|s| s.id.is_some_and(|id| known_ids.contains(&id)))
        .filter_map(|s| s.data.characters.clone())
        .collect()
}

pub struct WaniKaniClient {
    client: Client,
    base: Url,
    token: String,
}

impl WaniKaniClient {
    /// `None` when no API token is configured.
    pub fn from_config(config: &VocabularyConfig) -> Result<Option<Self>, ConfigError> {
        if config.api_token.trim().is_empty() {
            return Ok(None);
        }

        let base = Url::parse(&config.api_base).map_err(|e| ConfigError::Invalid {
            name: "WK_API_BASE",
            value: config.api_base.clone(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            base,
            token: config.api_token.clone(),
        }))
    }

    fn endpoint(&self, path: &str) -> Result<Url, VocabularyFetchError> {
        Ok(self.base.join(path)?)
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<T, VocabularyFetchError> {
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VocabularyFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch every page of a collection
    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<Resource<T>>, VocabularyFetchError> {
        let mut next = Some(self.endpoint(path)?.to_string());
        let mut all = Vec::new();

        while let Some(url) = next {
            let page: Collection<T> = self.get_page(&url).await?;
            debug!(url = %url, count = page.data.len(), "fetched page");
            all.extend(page.data);
            next = page.pages.and_then(|p| p.next_url);
        }

        Ok(all)
    }

    pub async fn fetch_username(&self) -> Result<String, VocabularyFetchError> {
        let url = self.endpoint(USER)?;
        let user: Resource<UserData> = self.get_page(url.as_str()).await?;
        Ok(user.data.username)
    }
}

#[async_trait]
impl VocabularySource for WaniKaniClient {
    async fn fetch_known(&self) -> Result<HashSet<String>, VocabularyFetchError> {
        let subjects: Vec<Resource<SubjectData>> =
            self.get_collection(VOCABULARY_SUBJECTS).await?;
        let assignments: Vec<Resource<AssignmentData>> =
            self.get_collection(GURU_AND_ABOVE_ASSIGNMENTS).await?;
        Ok(known_characters(&subjects, &assignments))
    }
}
