use crate::AppState;
use crate::api::error::AppError;
use crate::intake::extension_of;
use crate::models::EvidenceItem;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

#[utoipa::path(
    get,
    path = "/evidence",
    responses(
        (status = 200, description = "All evidence items", body = Vec<EvidenceItem>)
    ),
    tag = "evidence"
)]
pub async fn list_evidence(State(state): State<AppState>) -> Json<Vec<EvidenceItem>> {
    Json(state.cases.list_evidence().await)
}

#[utoipa::path(
    get,
    path = "/api/get_evidence/{case_id}",
    params(
        ("case_id" = String, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Evidence filed under the case; empty for unknown cases", body = Vec<EvidenceItem>)
    ),
    tag = "evidence"
)]
pub async fn get_evidence_by_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Json<Vec<EvidenceItem>> {
    Json(state.cases.evidence_for_case(&case_id).await)
}

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(
        ("filename" = String, Path, description = "Stored evidence file name")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found")
    ),
    tag = "evidence"
)]
pub async fn download_evidence(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let exists = state
        .storage
        .file_exists(&filename)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;
    if !exists {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let data = state.storage.read_file(&filename).await?;
    let content_type = content_type_for(&filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        Body::from(data),
    )
        .into_response())
}

fn content_type_for(filename: &str) -> mime::Mime {
    let essence = match extension_of(filename).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a_scene.PNG"), mime::IMAGE_PNG);
        assert_eq!(content_type_for("clip.mov").essence_str(), "video/quicktime");
        assert_eq!(content_type_for("unknown.bin"), mime::APPLICATION_OCTET_STREAM);
    }
}
