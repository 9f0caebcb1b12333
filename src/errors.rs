use crate::{api::ApiError, ValidationErrors};
use serde_json::Value;
use thiserror::Error;

/// Store-level failures surfaced to the view layer. Every variant renders as
/// a user-facing message; none is fatal, and the triggering action can always
/// be retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The profile record does not exist yet. Callers react by provisioning
    /// one and retrying the load.
    #[error("User not found")]
    NotFound,
    /// A read from the backend failed; any previously loaded state is kept.
    #[error("{0}")]
    FetchFailed(String),
    /// A profile update failed; the draft stays unpersisted.
    #[error("{0}")]
    SaveFailed(String),
    /// Plan generation requires a complete profile and medical conditions.
    #[error("Please complete your profile and medical conditions before generating a plan")]
    PrerequisiteMissing,
    /// The backend accepts exactly one file per commit.
    #[error("Only one file can be uploaded at a time")]
    TooManyFiles,
    #[error("{0}")]
    MedicalConditionsSaveFailed(String),
    #[error("{0}")]
    FileUploadFailed(String),
    #[error("You must be logged in to save your data")]
    NotAuthenticated,
    /// Field-level validation errors, resolved locally before any network
    /// call. The mapping is returned to the caller unchanged.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Prefer the backend-provided message, falling back to a generic one.
/// FastAPI error bodies carry the message under a `detail` key.
pub(crate) fn api_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::NotFound => "User not found".to_string(),
        ApiError::Status(_, body) => {
            let body = body.trim();
            if body.is_empty() {
                return fallback.to_string();
            }
            if let Ok(value) = serde_json::from_str::<Value>(body) {
                if let Some(detail) = value.get("detail").and_then(Value::as_str) {
                    return detail.to_string();
                }
            }
            body.to_string()
        }
        ApiError::Transport(_) | ApiError::Decode(_) => fallback.to_string(),
    }
}
