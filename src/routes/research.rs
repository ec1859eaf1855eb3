use crate::agents::{PaperReview, WorkflowResult};
use crate::models::{AppState, ConceptRequest, ConceptResponse, PaperCheckRequest, ResearchRequest};
use crate::types::AppResult;
use axum::{
    extract::State,
    response::Json as ResponseJson,
    routing::post,
    Json, Router,
};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/research", post(run_research))
        .route("/api/explain", post(explain_concept))
        .route("/api/check-paper", post(check_paper))
        .with_state(state)
}

/// Run the complete research workflow: literature search, synthesis,
/// and research extensions.
async fn run_research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> AppResult<ResponseJson<WorkflowResult>> {
    info!(topic = %request.topic, max_papers = request.max_papers, "Received research request");

    let result = state
        .orchestrator
        .run_research_workflow(&request.topic, request.max_papers)
        .await?;

    Ok(Json(result))
}

/// Explain a concept in simple terms
async fn explain_concept(
    State(state): State<AppState>,
    Json(request): Json<ConceptRequest>,
) -> AppResult<ResponseJson<ConceptResponse>> {
    info!(concept = %request.concept, "Received explain request");

    let explanation = state
        .orchestrator
        .explain_concept(&request.concept, request.context.as_deref())
        .await?;

    Ok(Json(ConceptResponse {
        concept: request.concept,
        explanation,
    }))
}

/// Check paper formatting
async fn check_paper(
    State(state): State<AppState>,
    Json(request): Json<PaperCheckRequest>,
) -> AppResult<ResponseJson<PaperReview>> {
    info!(title = %request.title, "Received paper check request");

    let review = state
        .orchestrator
        .check_paper(&request.title, &request.content)
        .await?;

    Ok(Json(review))
}
