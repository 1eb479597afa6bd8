use crate::api::error::AppError;
use crate::models::Reconstruction;
use crate::services::case_service::timestamp_now;
use crate::services::reconstruction::{analyze, display_name};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct ReconstructionRequest {
    #[validate(length(min = 1, max = 64, message = "analysis_type is required"))]
    pub analysis_type: String,
    pub case_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ReconstructionResponse {
    pub message: String,
    pub reconstruction: Reconstruction,
}

#[utoipa::path(
    post,
    path = "/reconstruction",
    request_body = ReconstructionRequest,
    responses(
        (status = 200, description = "Simulated analysis result", body = ReconstructionResponse),
        (status = 400, description = "Missing analysis type")
    ),
    tag = "reconstruction"
)]
pub async fn run_reconstruction(
    Json(req): Json<ReconstructionRequest>,
) -> Result<Json<ReconstructionResponse>, AppError> {
    req.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = analyze(&req.analysis_type);
    tracing::info!(
        "🧪 Reconstruction '{}' for {:?}: {}",
        req.analysis_type,
        req.case_id,
        result.title
    );

    Ok(Json(ReconstructionResponse {
        message: format!(
            "AI analysis completed for {}!",
            display_name(&req.analysis_type)
        ),
        reconstruction: Reconstruction {
            case_id: req.case_id,
            analysis_type: req.analysis_type,
            result,
            timestamp: timestamp_now(),
        },
    }))
}
