use crate::AppState;
use crate::api::error::AppError;
use crate::models::Case;
use crate::services::case_service::NewCase;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct CreateCaseRequest {
    #[validate(length(min = 1, max = 200, message = "Case title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 32, message = "Case date is required"))]
    pub date: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/cases",
    responses(
        (status = 200, description = "All cases", body = Vec<Case>)
    ),
    tag = "cases"
)]
pub async fn list_cases(State(state): State<AppState>) -> Json<Vec<Case>> {
    Json(state.cases.list_cases().await)
}

#[utoipa::path(
    get,
    path = "/cases/{id}",
    params(
        ("id" = String, Path, description = "Case ID, e.g. CASE-001")
    ),
    responses(
        (status = 200, description = "Case details", body = Case),
        (status = 404, description = "Unknown case")
    ),
    tag = "cases"
)]
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Case>, AppError> {
    state
        .cases
        .get_case(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Case {} not found", id)))
}

#[utoipa::path(
    post,
    path = "/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = Case),
        (status = 400, description = "Missing title or date")
    ),
    tag = "cases"
)]
pub async fn create_case(
    State(state): State<AppState>,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<Case>), AppError> {
    req.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let case = state
        .cases
        .create_case(NewCase {
            title: req.title,
            date: req.date,
            location: req.location,
            description: req.description,
        })
        .await;

    Ok((StatusCode::CREATED, Json(case)))
}
