use crate::AppState;
use crate::api::error::AppError;
use crate::models::CollaborationLog;
use crate::services::case_service::NewCollaboration;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct AddCollaborationRequest {
    #[validate(length(min = 1, message = "case_id is required"))]
    pub case_id: String,
    pub user: Option<String>,
    #[validate(length(min = 1, max = 200, message = "action must be between 1 and 200 characters"))]
    pub action: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Serialize, ToSchema)]
pub struct AddCollaborationResponse {
    pub success: bool,
    pub log: CollaborationLog,
}

#[utoipa::path(
    get,
    path = "/collaboration",
    responses(
        (status = 200, description = "Collaboration log, oldest first", body = Vec<CollaborationLog>)
    ),
    tag = "collaboration"
)]
pub async fn list_collaboration(State(state): State<AppState>) -> Json<Vec<CollaborationLog>> {
    Json(state.cases.list_collaboration().await)
}

#[utoipa::path(
    post,
    path = "/api/add_collaboration",
    request_body = AddCollaborationRequest,
    responses(
        (status = 200, description = "Log entry added", body = AddCollaborationResponse),
        (status = 400, description = "Missing case or action")
    ),
    tag = "collaboration"
)]
pub async fn add_collaboration(
    State(state): State<AppState>,
    Json(req): Json<AddCollaborationRequest>,
) -> Result<Json<AddCollaborationResponse>, AppError> {
    req.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let log = state
        .cases
        .add_collaboration(NewCollaboration {
            case_id: req.case_id,
            user: req.user.filter(|u| !u.trim().is_empty()),
            action: req.action,
            details: req.details,
        })
        .await;

    Ok(Json(AddCollaborationResponse { success: true, log }))
}
