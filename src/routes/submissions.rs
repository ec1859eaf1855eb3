use crate::db::SubmissionStore;
use crate::models::{
    AppState, NewSubmission, PaperSubmitRequest, PaperSubmitResponse, SubmissionStatusResponse,
};
use crate::types::{AppError, AppResult};
use axum::{
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use validator::Validate;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/submit-paper", post(submit_paper))
        .route("/api/submission/{submission_id}", get(get_submission))
        .with_state(state)
}

/// Run the formatting check, then persist the submission with the
/// review flattened into its feedback column.
async fn submit_paper(
    State(state): State<AppState>,
    Json(request): Json<PaperSubmitRequest>,
) -> AppResult<ResponseJson<PaperSubmitResponse>> {
    request
        .validate()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    info!(title = %request.title, "Received paper submission");

    let review = state
        .orchestrator
        .check_paper(&request.title, &request.content)
        .await?;
    let feedback =
        serde_json::to_string(&review).map_err(|e| AppError::Internal(e.to_string()))?;

    let submission = SubmissionStore::create(
        &state.pool,
        &NewSubmission {
            title: request.title,
            authors: request.authors.join(", "),
            content: request.content,
            professor_email: request.professor_email.clone(),
            feedback,
        },
    )
    .await?;

    Ok(Json(PaperSubmitResponse {
        submission_id: submission.submission_id,
        status: submission.status,
        message: format!("Paper submitted to {}", request.professor_email),
        submitted_at: submission.submitted_at.to_rfc3339(),
    }))
}

/// Check submission status by identifier
async fn get_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
) -> AppResult<ResponseJson<SubmissionStatusResponse>> {
    info!(submission_id = %submission_id, "Submission lookup");

    let submission = SubmissionStore::get(&state.pool, &submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionStatusResponse {
        submission_id: submission.submission_id,
        title: submission.title,
        status: submission.status,
        submitted_at: submission.submitted_at.to_rfc3339(),
        feedback: submission.feedback,
    }))
}
