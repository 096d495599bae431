//! Wikipedia lookup client
//!
//! The `wiki` keyword is the one network-bound resolver. The [`WikiClient`]
//! trait keeps the evaluator testable; [`HttpWikiClient`] talks to the real
//! API and [`MockWikiClient`] returns canned titles.

use crate::error::PromptError;
use async_trait::async_trait;
use serde::Deserialize;

/// Wikipedia search API endpoint (query appended as `srsearch`)
const SEARCH_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Wikipedia random-page endpoint
const RANDOM_API_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/random/summary";

/// Asynchronous wiki lookup used by the `wiki` keyword
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Search for pages, returning result titles in API order.
    async fn search(&self, query: &str) -> Result<Vec<String>, PromptError>;

    /// Fetch one globally-random page title.
    async fn random_title(&self) -> Result<String, PromptError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
}

#[derive(Debug, Deserialize)]
struct RandomSummary {
    title: String,
}

/// Production client backed by the Wikipedia HTTP API
pub struct HttpWikiClient {
    client: reqwest::Client,
}

impl Default for HttpWikiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpWikiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WikiClient for HttpWikiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, PromptError> {
        tracing::debug!(query, "wiki search request");

        let response: SearchResponse = self
            .client
            .get(SEARCH_API_URL)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", query),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(response
            .query
            .search
            .into_iter()
            .map(|result| result.title)
            .collect())
    }

    async fn random_title(&self) -> Result<String, PromptError> {
        tracing::debug!("wiki random page request");

        let summary: RandomSummary = self
            .client
            .get(RANDOM_API_URL)
            .send()
            .await?
            .json()
            .await?;

        Ok(summary.title)
    }
}

/// Canned-response client for tests and offline use
pub struct MockWikiClient {
    titles: Vec<String>,
}

impl Default for MockWikiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWikiClient {
    pub fn new() -> Self {
        Self {
            titles: vec![
                "Lighthouse".to_string(),
                "Trade winds".to_string(),
                "Celestial navigation".to_string(),
            ],
        }
    }

    pub fn with_titles(titles: Vec<String>) -> Self {
        Self { titles }
    }
}

#[async_trait]
impl WikiClient for MockWikiClient {
    async fn search(&self, _query: &str) -> Result<Vec<String>, PromptError> {
        Ok(self.titles.clone())
    }

    async fn random_title(&self) -> Result<String, PromptError> {
        self.titles
            .first()
            .cloned()
            .ok_or_else(|| PromptError::EmptySearch {
                query: String::new(),
            })
    }
}
