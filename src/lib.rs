pub mod api;
pub mod config;
pub mod intake;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::IntakeConfig;
use crate::intake::IntakePolicy;
use crate::services::case_service::CaseService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::intake::validate_batch,
        api::handlers::intake::get_policy,
        api::handlers::upload::upload_evidence,
        api::handlers::cases::list_cases,
        api::handlers::cases::get_case,
        api::handlers::cases::create_case,
        api::handlers::evidence::list_evidence,
        api::handlers::evidence::get_evidence_by_case,
        api::handlers::evidence::download_evidence,
        api::handlers::collaboration::list_collaboration,
        api::handlers::collaboration::add_collaboration,
        api::handlers::reconstruction::run_reconstruction,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::intake::CandidateInput,
            api::handlers::intake::ValidateBatchRequest,
            api::handlers::intake::ValidateBatchResponse,
            api::handlers::intake::PolicyResponse,
            api::handlers::upload::UploadResponse,
            api::handlers::cases::CreateCaseRequest,
            api::handlers::collaboration::AddCollaborationRequest,
            api::handlers::collaboration::AddCollaborationResponse,
            api::handlers::reconstruction::ReconstructionRequest,
            api::handlers::reconstruction::ReconstructionResponse,
            intake::FileCandidate,
            intake::IntakeDecision,
            intake::RejectionReason,
            intake::session::StagedFile,
            intake::session::NotificationKind,
            services::notification::Notification,
            models::Case,
            models::EvidenceItem,
            models::CollaborationLog,
            models::AnalysisResult,
            models::Reconstruction,
        )
    ),
    tags(
        (name = "intake", description = "Evidence file admission rules"),
        (name = "evidence", description = "Evidence upload and retrieval"),
        (name = "cases", description = "Case management"),
        (name = "collaboration", description = "Collaborative review log"),
        (name = "reconstruction", description = "Simulated scene analysis"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub cases: Arc<CaseService>,
    pub policy: IntakePolicy,
    pub config: IntakeConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>, cases: Arc<CaseService>, config: IntakeConfig) -> Self {
        Self {
            storage,
            cases,
            policy: config.policy(),
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/intake/policy", get(api::handlers::intake::get_policy))
        .route("/intake/validate", post(api::handlers::intake::validate_batch))
        .route(
            "/upload",
            post(api::handlers::upload::upload_evidence)
                .layer(DefaultBodyLimit::max(state.config.max_request_size)),
        )
        .route(
            "/cases",
            get(api::handlers::cases::list_cases).post(api::handlers::cases::create_case),
        )
        .route("/cases/:id", get(api::handlers::cases::get_case))
        .route("/evidence", get(api::handlers::evidence::list_evidence))
        .route(
            "/api/get_evidence/:case_id",
            get(api::handlers::evidence::get_evidence_by_case),
        )
        .route(
            "/uploads/:filename",
            get(api::handlers::evidence::download_evidence),
        )
        .route(
            "/collaboration",
            get(api::handlers::collaboration::list_collaboration),
        )
        .route(
            "/api/add_collaboration",
            post(api::handlers::collaboration::add_collaboration),
        )
        .route(
            "/reconstruction",
            post(api::handlers::reconstruction::run_reconstruction),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
