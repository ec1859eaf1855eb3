// Submission identifier generation

use uuid::Uuid;

/// Generate a submission identifier: `SUB-` plus 8 uppercase hex
/// characters drawn from a v4 UUID. No uniqueness check is performed;
/// collision odds are negligible at expected submission volumes.
pub fn generate_submission_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("SUB-{}", hex[..8].to_uppercase())
}
