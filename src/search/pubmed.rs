//! PubMed E-utilities Client
//!
//! Two-phase literature lookup against NCBI's E-utilities:
//!
//! 1. **esearch**: resolve a free-text query to a bounded list of PMIDs
//! 2. **esummary**: batch-fetch metadata for all resolved ids in one call
//!
//! The public `search` method never fails: transport or decode errors
//! degrade to an empty result list, and a single malformed record is
//! skipped without aborting the batch. There is no retry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Authors beyond this count are dropped from the record.
const MAX_AUTHORS: usize = 3;

/// Errors that can occur during the fallible phases of a lookup
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

/// A single paper as returned by the esummary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed identifier
    pub pmid: String,
    /// Title of the paper
    pub title: String,
    /// Author names, first three only
    pub authors: Vec<String>,
    /// Full journal name
    pub journal: String,
    /// Publication date as reported upstream
    pub pubdate: String,
    /// Canonical PubMed link
    pub link: String,
    /// DOI if the record carries one
    pub doi: Option<String>,
}

/// Client for the PubMed E-utilities endpoints
pub struct PubMedClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
}

impl PubMedClient {
    /// Create a new client. `base_url` points at the E-utilities root and
    /// is injectable so tests can run against a local mock server.
    pub fn new(base_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            email: email.into(),
        }
    }

    pub fn from_config(config: &crate::config::SearchConfig) -> Self {
        Self::new(&config.pubmed_base_url, &config.pubmed_email)
    }

    /// Search PubMed for papers matching `query`, capped at `max_results`.
    ///
    /// Degrades to an empty list on any upstream failure; callers never
    /// see an error from this method.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<PaperRecord> {
        match self.try_search(query, max_results).await {
            Ok(records) => {
                info!(query = %query, count = records.len(), "PubMed search completed");
                records
            }
            Err(e) => {
                warn!(query = %query, error = %e, "PubMed search failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, SearchError> {
        let ids = self.search_ids(query, max_results).await?;
        if ids.is_empty() {
            debug!(query = %query, "PubMed returned no ids");
            return Ok(Vec::new());
        }
        self.fetch_summaries(&ids).await
    }

    /// Phase one: resolve the query to a list of PMIDs
    async fn search_ids(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let retmax = max_results.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("db", "pubmed"),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
                ("email", self.email.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: Value = response.json().await?;
        let ids = data
            .pointer("/esearchresult/idlist")
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }

    /// Phase two: one batch metadata fetch for all ids
    async fn fetch_summaries(&self, ids: &[String]) -> Result<Vec<PaperRecord>, SearchError> {
        let url = format!("{}/esummary.fcgi", self.base_url);
        let id_list = ids.join(",");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("db", "pubmed"),
                ("id", id_list.as_str()),
                ("retmode", "json"),
                ("email", self.email.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: Value = response.json().await?;
        let result = data
            .get("result")
            .ok_or_else(|| SearchError::ParseError("Missing result object".to_string()))?;

        let mut records = Vec::new();
        for pmid in ids {
            match result.get(pmid.as_str()) {
                Some(entry) if entry.is_object() => records.push(Self::extract_record(pmid, entry)),
                _ => {
                    warn!(pmid = %pmid, "Skipping malformed summary record");
                }
            }
        }

        Ok(records)
    }

    /// Pull the fields the workflow cares about out of one summary entry.
    /// Missing optional fields default rather than fail.
    fn extract_record(pmid: &str, entry: &Value) -> PaperRecord {
        let field = |name: &str| {
            entry
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let authors = entry
            .get("authors")
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .take(MAX_AUTHORS)
                    .filter_map(|author| author.get("name").and_then(|n| n.as_str()))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let doi = entry
            .get("elocationid")
            .and_then(|v| v.as_str())
            .map(|s| s.trim_start_matches("doi: ").to_string())
            .filter(|s| !s.is_empty());

        PaperRecord {
            pmid: pmid.to_string(),
            title: field("title"),
            authors,
            journal: field("fulljournalname"),
            pubdate: field("pubdate"),
            link: format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/"),
            doi,
        }
    }
}

/// Format records as a text block for inclusion in a search prompt
pub fn format_records(records: &[PaperRecord]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, record.title));
        if !record.authors.is_empty() {
            output.push_str(&format!("   Authors: {}\n", record.authors.join(", ")));
        }
        if !record.journal.is_empty() {
            output.push_str(&format!(
                "   Published in: {} ({})\n",
                record.journal, record.pubdate
            ));
        }
        output.push_str(&format!("   Link: {}\n", record.link));
        if let Some(doi) = &record.doi {
            output.push_str(&format!("   DOI: {doi}\n"));
        }
    }

    output
}
