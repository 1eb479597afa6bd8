use crate::AppState;
use crate::api::error::AppError;
use crate::intake::session::{IntakeSession, StagedFile, StagedRows};
use crate::intake::{FileCandidate, IntakeDecision};
use crate::services::notification::{Notification, RecordingNotifier};
use crate::utils::format::format_file_size;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CandidateInput {
    pub name: String,
    pub size: u64,
}

#[derive(Deserialize, ToSchema, Validate)]
pub struct ValidateBatchRequest {
    #[validate(length(max = 1000, message = "A batch may hold at most 1000 files"))]
    pub files: Vec<CandidateInput>,
}

#[derive(Serialize, ToSchema)]
pub struct ValidateBatchResponse {
    pub decisions: Vec<IntakeDecision>,
    pub accepted: usize,
    pub rejected: usize,
    pub staged: Vec<StagedFile>,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize, ToSchema)]
pub struct PolicyResponse {
    pub max_size_bytes: u64,
    pub max_size: String,
    pub allowed_extensions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/intake/validate",
    request_body = ValidateBatchRequest,
    responses(
        (status = 200, description = "Per-file intake decisions, in request order", body = ValidateBatchResponse),
        (status = 400, description = "Malformed batch")
    ),
    tag = "intake"
)]
pub async fn validate_batch(
    State(state): State<AppState>,
    Json(req): Json<ValidateBatchRequest>,
) -> Result<Json<ValidateBatchResponse>, AppError> {
    req.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut session = IntakeSession::new(
        state.policy.clone(),
        StagedRows::default(),
        RecordingNotifier::default(),
    );
    let decisions = session.submit_batch(
        req.files
            .into_iter()
            .map(|f| FileCandidate::new(f.name, f.size)),
    );

    let (list, view, notifier) = session.into_parts();
    tracing::info!(
        "🔎 Validated batch of {}: {} accepted",
        decisions.len(),
        list.len()
    );

    Ok(Json(ValidateBatchResponse {
        accepted: list.len(),
        rejected: decisions.len() - list.len(),
        decisions,
        staged: view.into_rows(),
        notifications: notifier.into_notifications(),
    }))
}

#[utoipa::path(
    get,
    path = "/intake/policy",
    responses(
        (status = 200, description = "Active admission rules", body = PolicyResponse)
    ),
    tag = "intake"
)]
pub async fn get_policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        max_size_bytes: state.policy.max_size_bytes,
        max_size: format_file_size(state.policy.max_size_bytes),
        allowed_extensions: state.policy.sorted_extensions(),
    })
}
