use crate::AppState;
use crate::api::error::AppError;
use crate::intake::session::{IntakeSession, NotificationKind, Notifier, StagedFile, StagedRows};
use crate::intake::{FileCandidate, IntakeDecision};
use crate::models::{Case, EvidenceItem};
use crate::services::case_service::{DEFAULT_CASE_ID, NewCase, NewEvidence};
use crate::services::notification::{Notification, RecordingNotifier};
use crate::services::storage::StoredFile;
use crate::utils::validation::{sanitize_filename, unique_stored_name};
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};
use futures::TryStreamExt;
use serde::Serialize;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub case: Option<Case>,
    pub evidence: Vec<EvidenceItem>,
    pub decisions: Vec<IntakeDecision>,
    pub staged: Vec<StagedFile>,
    pub notifications: Vec<Notification>,
}

#[derive(Default)]
struct CaseForm {
    title: Option<String>,
    date: Option<String>,
    location: Option<String>,
    description: Option<String>,
    notes: String,
}

impl CaseForm {
    /// A case is created only when both title and date were filled in.
    fn new_case(&mut self) -> Option<NewCase> {
        let title = self.title.take().filter(|t| !t.trim().is_empty())?;
        let date = self.date.take().filter(|d| !d.trim().is_empty())?;
        Some(NewCase {
            title,
            date,
            location: self.location.take().filter(|l| !l.trim().is_empty()),
            description: self.description.take().filter(|d| !d.trim().is_empty()),
        })
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "Case fields and evidence files (field `evidence_files`, repeatable)"),
    responses(
        (status = 200, description = "Batch processed; rejected files are reported in `notifications`", body = UploadResponse),
        (status = 400, description = "Malformed multipart body"),
        (status = 413, description = "Request larger than the configured upload limit")
    ),
    tag = "evidence"
)]
pub async fn upload_evidence(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut form = CaseForm::default();
    let mut staged: Vec<(FileCandidate, StoredFile)> = Vec::new();

    let read_result = read_form(&state, &mut multipart, &mut form, &mut staged).await;
    if let Err(e) = read_result {
        discard_staged(&state, &staged).await;
        return Err(e);
    }

    let mut session = IntakeSession::new(
        state.policy.clone(),
        StagedRows::default(),
        RecordingNotifier::default(),
    );

    let case = match form.new_case() {
        Some(new_case) => {
            let case = state.cases.create_case(new_case).await;
            session.notifier_mut().notify(
                &format!("Case {} created successfully!", case.id),
                NotificationKind::Success,
            );
            Some(case)
        }
        None => None,
    };
    let case_id = case
        .as_ref()
        .map(|c| c.id.clone())
        .unwrap_or_else(|| DEFAULT_CASE_ID.to_string());

    let decisions = session.submit_batch(staged.iter().map(|(candidate, _)| candidate.clone()));

    let mut evidence = Vec::new();
    // Position of the next accepted file in the session's intake list
    let mut list_index = 0;

    for (decision, (_, stored)) in decisions.iter().zip(&staged) {
        let candidate = match decision {
            IntakeDecision::Accepted { candidate, .. } => candidate,
            IntakeDecision::Rejected { .. } => {
                discard(&state, &stored.key).await;
                continue;
            }
        };

        match keep_file(&state, candidate, stored).await {
            Ok(filename) => {
                let item = state
                    .cases
                    .record_evidence(NewEvidence {
                        case_id: case_id.clone(),
                        name: candidate.name.clone(),
                        filename: Some(filename),
                        size: Some(stored.size),
                        sha256: Some(stored.hash.clone()),
                        notes: form.notes.clone(),
                    })
                    .await;
                tracing::info!(
                    "📦 Evidence {} ({}) filed under {}",
                    item.id,
                    candidate.name,
                    case_id
                );
                session.notifier_mut().notify(
                    &format!("Evidence {} uploaded successfully!", candidate.name),
                    NotificationKind::Success,
                );
                evidence.push(item);
                list_index += 1;
            }
            Err(e) => {
                tracing::error!("Failed to keep {}: {:?}", candidate.name, e);
                discard(&state, &stored.key).await;
                session.remove(list_index)?;
                session.notifier_mut().notify(
                    &format!("Could not store {}", candidate.name),
                    NotificationKind::Error,
                );
            }
        }
    }

    let (_, view, notifier) = session.into_parts();

    Ok(Json(UploadResponse {
        case,
        evidence,
        decisions,
        staged: view.into_rows(),
        notifications: notifier.into_notifications(),
    }))
}

async fn read_form(
    state: &AppState,
    multipart: &mut Multipart,
    form: &mut CaseForm,
    staged: &mut Vec<(FileCandidate, StoredFile)>,
) -> Result<(), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "evidence_files" => {
                let original_filename = field.file_name().unwrap_or_default().to_string();
                // Browsers submit an empty part when no file was picked
                if original_filename.is_empty() {
                    continue;
                }
                let stored = stage_file(state, field).await?;
                staged.push((FileCandidate::new(original_filename, stored.size), stored));
            }
            "case_title" => form.title = Some(field_text(field).await?),
            "case_date" => form.date = Some(field_text(field).await?),
            "case_location" => form.location = Some(field_text(field).await?),
            "case_description" => form.description = Some(field_text(field).await?),
            "evidence_notes" => form.notes = field_text(field).await?,
            _ => tracing::debug!("Ignoring form field '{}'", name),
        }
    }

    Ok(())
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Streams an uploaded file into the staging area so its real size is known
/// before it is judged.
async fn stage_file(state: &AppState, field: Field<'_>) -> Result<StoredFile, AppError> {
    let staging_key = format!("staging/{}", Uuid::new_v4());
    let body_with_io_error = field.map_err(std::io::Error::other);
    let reader = StreamReader::new(body_with_io_error);

    state
        .storage
        .store_stream_with_hash(&staging_key, Box::new(reader))
        .await
        .map_err(|e| {
            tracing::error!("Staging upload failed: {:?}", e);
            AppError::Internal(e.to_string())
        })
}

/// Moves an accepted file from staging to its permanent name.
async fn keep_file(
    state: &AppState,
    candidate: &FileCandidate,
    stored: &StoredFile,
) -> anyhow::Result<String> {
    let filename = unique_stored_name(&sanitize_filename(&candidate.name)?);
    state.storage.promote(&stored.key, &filename).await?;
    Ok(filename)
}

async fn discard(state: &AppState, key: &str) {
    if let Err(e) = state.storage.delete_file(key).await {
        tracing::warn!("Failed to delete staged file {}: {:?}", key, e);
    }
}

async fn discard_staged(state: &AppState, staged: &[(FileCandidate, StoredFile)]) {
    for (_, stored) in staged {
        discard(state, &stored.key).await;
    }
}
