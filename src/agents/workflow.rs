//! Workflow Sequencer
//!
//! The three public operations of the assistant, each driven through the
//! conversation coordinator:
//!
//! - **Research workflow**: search → synthesize → extend, strictly in
//!   order, each stage's prompt embedding the previous stage's output
//! - **Explain concept**: one run with an optional context block
//! - **Check paper**: one run producing a structured review
//!
//! Coordinator failures propagate unmodified; there is no partial-result
//! path and no retry.

use crate::agents::coordinator::TaskRunner;
use crate::search::pubmed::{format_records, PaperRecord};
use crate::search::PubMedClient;
use crate::types::AppResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Characters of paper content included in a formatting-check prompt;
/// anything beyond this is never sent to the model.
pub(crate) const PAPER_CHECK_CONTENT_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Completed,
}

/// Output of a full research workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub topic: String,
    pub literature: String,
    pub synthesis: String,
    pub extensions: String,
    pub status: WorkflowStatus,
}

/// Structured formatting review. The generation step populates these
/// fields directly; nothing downstream re-parses prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperReview {
    /// Formatting score, 0-100
    pub score: u8,
    pub missing_sections: Vec<String>,
    pub recommendations: Vec<String>,
    pub assessment: String,
}

#[derive(Debug, Deserialize)]
struct PaperReviewRaw {
    score: i64,
    #[serde(default)]
    missing_sections: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    assessment: String,
}

/// Application-scoped workflow driver. Built once at startup and shared
/// by reference through `AppState`; holds the coordinator seam and the
/// literature client, no per-request state.
pub struct Orchestrator {
    runner: Arc<dyn TaskRunner>,
    literature: PubMedClient,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn TaskRunner>, literature: PubMedClient) -> Self {
        Self { runner, literature }
    }

    /// Run the full three-stage research workflow. Stages execute
    /// strictly in order; any stage failure fails the whole run.
    pub async fn run_research_workflow(
        &self,
        topic: &str,
        max_papers: usize,
    ) -> AppResult<WorkflowResult> {
        info!(topic = %topic, max_papers, "Starting research workflow");

        // Stage A: literature search, seeded with indexed records
        let papers = self.literature.search(topic, max_papers).await;
        let literature = self
            .runner
            .run_task(&build_search_prompt(topic, max_papers, &papers))
            .await?;
        info!(literature_len = literature.len(), "Literature stage complete");

        // Stage B: synthesis over stage A's text
        let synthesis = self
            .runner
            .run_task(&build_synthesis_prompt(&literature))
            .await?;
        info!(synthesis_len = synthesis.len(), "Synthesis stage complete");

        // Stage C: research extensions over stage B's text
        let extensions = self
            .runner
            .run_task(&build_extensions_prompt(&synthesis))
            .await?;
        info!(extensions_len = extensions.len(), "Extensions stage complete");

        Ok(WorkflowResult {
            topic: topic.to_string(),
            literature,
            synthesis,
            extensions,
            status: WorkflowStatus::Completed,
        })
    }

    /// Explain a concept in simple terms, optionally grounded in caller
    /// context.
    pub async fn explain_concept(
        &self,
        concept: &str,
        context: Option<&str>,
    ) -> AppResult<String> {
        info!(concept = %concept, has_context = context.is_some(), "Explaining concept");
        self.runner
            .run_task(&build_explain_prompt(concept, context))
            .await
    }

    /// Check a paper's formatting and return a structured review.
    pub async fn check_paper(&self, title: &str, content: &str) -> AppResult<PaperReview> {
        info!(title = %title, content_len = content.len(), "Checking paper");
        let raw = self
            .runner
            .run_task(&build_check_prompt(title, content))
            .await?;
        Ok(parse_review(&raw))
    }
}

fn build_search_prompt(topic: &str, max_papers: usize, papers: &[PaperRecord]) -> String {
    let index_block = if papers.is_empty() {
        "No indexed papers were retrieved for this topic; rely on your own knowledge.".to_string()
    } else {
        format_records(papers)
    };

    format!(
        r#"Search for academic papers on: "{topic}"
Find up to {max_papers} relevant papers.

Indexed results from PubMed:
{index_block}

Return DOI, title, authors, abstract, and link for each paper."#
    )
}

fn build_synthesis_prompt(literature: &str) -> String {
    format!(
        r#"Analyze and summarize these papers:
{literature}

Create concise summaries with key findings."#
    )
}

fn build_extensions_prompt(synthesis: &str) -> String {
    format!(
        r#"Based on these summaries:
{synthesis}

Propose 5 future research extensions with:
- Title
- Description
- One-line solution approach
- Difficulty level"#
    )
}

fn build_explain_prompt(concept: &str, context: Option<&str>) -> String {
    let mut prompt = format!("Explain this concept in simple terms: {concept}");
    if let Some(context) = context {
        prompt.push_str(&format!("\n\nContext: {context}"));
    }
    prompt.push_str("\n\nProvide: simple explanation, examples, analogies");
    prompt
}

fn build_check_prompt(title: &str, content: &str) -> String {
    let excerpt: String = content.chars().take(PAPER_CHECK_CONTENT_LIMIT).collect();

    format!(
        r#"Check this paper's formatting:

Title: {title}

Content:
{excerpt}

Respond with ONLY valid JSON:
{{
  "score": <formatting score, 0-100 integer>,
  "missing_sections": ["missing section name"],
  "recommendations": ["improvement recommendation"],
  "assessment": "overall assessment"
}}"#
    )
}

/// Strip a markdown code fence if the model wrapped its JSON in one
fn extract_json(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(response)
            .trim()
    } else if response.contains("```") {
        response.split("```").nth(1).unwrap_or(response).trim()
    } else {
        response.trim()
    }
}

/// Parse the review JSON; an unparseable reply degrades to the raw text
/// as the assessment.
fn parse_review(response: &str) -> PaperReview {
    match serde_json::from_str::<PaperReviewRaw>(extract_json(response)) {
        Ok(raw) => PaperReview {
            score: raw.score.clamp(0, 100) as u8,
            missing_sections: raw.missing_sections,
            recommendations: raw.recommendations,
            assessment: raw.assessment,
        },
        Err(e) => {
            warn!(error = %e, "Review response was not valid JSON, keeping raw text");
            PaperReview {
                score: 0,
                missing_sections: vec![],
                recommendations: vec![],
                assessment: response.to_string(),
            }
        }
    }
}
