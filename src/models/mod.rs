use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub date: String,
    pub status: String,
    pub location: Option<String>,
    pub officer: String,
    pub priority: String,
    pub evidence_count: u32,
    pub last_updated: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceItem {
    pub id: String,
    pub case_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date_collected: String,
    pub collected_by: String,
    pub status: String,
    pub notes: String,
    /// Stored file name under the upload directory, if a file backs this item.
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaborationLog {
    pub id: String,
    pub case_id: String,
    pub user: String,
    pub action: String,
    pub timestamp: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub title: String,
    pub findings: Vec<String>,
    pub confidence: u8,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reconstruction {
    pub case_id: Option<String>,
    #[serde(rename = "type")]
    pub analysis_type: String,
    pub result: AnalysisResult,
    pub timestamp: String,
}
