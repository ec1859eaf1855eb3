use crate::models::{NewSubmission, Submission};
use crate::types::AppResult;
use crate::utils::generate_submission_id;
use sqlx::PgPool;
use tracing::info;

pub struct SubmissionStore;

impl SubmissionStore {
    /// Insert a new submission and return the stored row. The identifier
    /// is generated here, at creation time, and never reused.
    pub async fn create(pool: &PgPool, submission: &NewSubmission) -> AppResult<Submission> {
        let submission_id = generate_submission_id();

        let row = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions
                (submission_id, title, authors, content, professor_email, status, feedback)
            VALUES ($1, $2, $3, $4, $5, 'submitted', $6)
            RETURNING *
            "#,
        )
        .bind(&submission_id)
        .bind(&submission.title)
        .bind(&submission.authors)
        .bind(&submission.content)
        .bind(&submission.professor_email)
        .bind(&submission.feedback)
        .fetch_one(pool)
        .await?;

        info!(submission_id = %row.submission_id, "Submission stored");
        Ok(row)
    }

    /// Exact-match lookup. A missing row is `Ok(None)`, distinct from a
    /// store error.
    pub async fn get(pool: &PgPool, submission_id: &str) -> AppResult<Option<Submission>> {
        let row = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE submission_id = $1",
        )
        .bind(submission_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}
