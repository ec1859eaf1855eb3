use crate::agents::Orchestrator;
use crate::config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

// Persisted rows
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Submission {
    pub submission_id: String,
    pub title: String,
    pub authors: String,
    pub content: String,
    pub professor_email: String,
    pub status: String,
    pub feedback: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Fields the caller supplies when creating a submission; identifier,
/// status, and timestamp are generated by the store.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub title: String,
    pub authors: String,
    pub content: String,
    pub professor_email: String,
    pub feedback: String,
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default = "default_max_papers")]
    pub max_papers: usize,
}

fn default_max_papers() -> usize {
    5
}

#[derive(Debug, serde::Deserialize)]
pub struct ConceptRequest {
    pub concept: String,
    pub context: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ConceptResponse {
    pub concept: String,
    pub explanation: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct PaperCheckRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct PaperSubmitRequest {
    pub title: String,
    pub authors: Vec<String>,
    pub content: String,
    #[validate(email)]
    pub professor_email: String,
}

#[derive(Debug, serde::Serialize)]
pub struct PaperSubmitResponse {
    pub submission_id: String,
    pub status: String,
    pub message: String,
    pub submitted_at: String,
}

#[derive(Debug, serde::Serialize)]
pub struct SubmissionStatusResponse {
    pub submission_id: String,
    pub title: String,
    pub status: String,
    pub submitted_at: String,
    pub feedback: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_request_defaults_max_papers() {
        let request: ResearchRequest =
            serde_json::from_str(r#"{"topic": "gene editing"}"#).unwrap();
        assert_eq!(request.max_papers, 5);
    }

    #[test]
    fn test_submit_request_rejects_bad_email() {
        let request = PaperSubmitRequest {
            title: "T".to_string(),
            authors: vec!["A".to_string()],
            content: "C".to_string(),
            professor_email: "not-an-email".to_string(),
        };
        assert!(request.validate().is_err());

        let request = PaperSubmitRequest {
            professor_email: "prof@university.edu".to_string(),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
