use crate::models::{Case, CollaborationLog, EvidenceItem};
use chrono::Local;
use tokio::sync::RwLock;

/// Case the evidence of an upload is filed under when no new case accompanies it.
pub const DEFAULT_CASE_ID: &str = "CASE-001";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub struct NewCase {
    pub title: String,
    pub date: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub struct NewEvidence {
    pub case_id: String,
    pub name: String,
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub sha256: Option<String>,
    pub notes: String,
}

pub struct NewCollaboration {
    pub case_id: String,
    pub user: Option<String>,
    pub action: String,
    pub details: String,
}

#[derive(Default)]
struct Registry {
    cases: Vec<Case>,
    evidence: Vec<EvidenceItem>,
    logs: Vec<CollaborationLog>,
}

/// In-memory store of cases, evidence records and collaboration logs.
/// Contents are lost when the process exits.
#[derive(Default)]
pub struct CaseService {
    inner: RwLock<Registry>,
}

impl CaseService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with demonstration cases.
    pub fn with_sample_data() -> Self {
        Self {
            inner: RwLock::new(sample_registry()),
        }
    }

    pub async fn create_case(&self, new_case: NewCase) -> Case {
        let mut registry = self.inner.write().await;
        let case = Case {
            id: format!("CASE-{:03}", registry.cases.len() + 100),
            title: new_case.title,
            date: new_case.date,
            status: "Active".to_string(),
            location: new_case.location,
            officer: "User".to_string(),
            priority: "Medium".to_string(),
            evidence_count: 0,
            last_updated: timestamp_now(),
            description: new_case.description,
        };
        registry.cases.push(case.clone());
        tracing::info!("📁 Case {} created: {}", case.id, case.title);
        case
    }

    pub async fn list_cases(&self) -> Vec<Case> {
        self.inner.read().await.cases.clone()
    }

    pub async fn get_case(&self, case_id: &str) -> Option<Case> {
        self.inner
            .read()
            .await
            .cases
            .iter()
            .find(|c| c.id == case_id)
            .cloned()
    }

    /// Records an evidence item and bumps the owning case's counters. Evidence
    /// for an unknown case is still recorded.
    pub async fn record_evidence(&self, new_evidence: NewEvidence) -> EvidenceItem {
        let mut registry = self.inner.write().await;
        let now = timestamp_now();
        let item = EvidenceItem {
            id: format!("EVD-{:03}", registry.evidence.len() + 100),
            kind: evidence_kind(&new_evidence.name),
            case_id: new_evidence.case_id,
            name: new_evidence.name,
            date_collected: now.clone(),
            collected_by: "User".to_string(),
            status: "Uploaded".to_string(),
            notes: new_evidence.notes,
            filename: new_evidence.filename,
            size: new_evidence.size,
            sha256: new_evidence.sha256,
        };

        match registry.cases.iter_mut().find(|c| c.id == item.case_id) {
            Some(case) => {
                case.evidence_count += 1;
                case.last_updated = now;
            }
            None => tracing::warn!(
                "Evidence {} filed under unknown case {}",
                item.id,
                item.case_id
            ),
        }

        registry.evidence.push(item.clone());
        item
    }

    pub async fn list_evidence(&self) -> Vec<EvidenceItem> {
        self.inner.read().await.evidence.clone()
    }

    pub async fn evidence_for_case(&self, case_id: &str) -> Vec<EvidenceItem> {
        self.inner
            .read()
            .await
            .evidence
            .iter()
            .filter(|e| e.case_id == case_id)
            .cloned()
            .collect()
    }

    pub async fn add_collaboration(&self, entry: NewCollaboration) -> CollaborationLog {
        let mut registry = self.inner.write().await;
        let log = CollaborationLog {
            id: format!("LOG-{:03}", registry.logs.len() + 100),
            case_id: entry.case_id,
            user: entry.user.unwrap_or_else(|| "User".to_string()),
            action: entry.action,
            timestamp: timestamp_now(),
            details: entry.details,
        };
        registry.logs.push(log.clone());
        log
    }

    pub async fn list_collaboration(&self) -> Vec<CollaborationLog> {
        self.inner.read().await.logs.clone()
    }
}

/// Evidence type label: the upper-cased extension, or the whole name when
/// there is no dot.
fn evidence_kind(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_uppercase()
}

fn sample_registry() -> Registry {
    let case = |id: &str,
                title: &str,
                date: &str,
                status: &str,
                location: &str,
                officer: &str,
                priority: &str,
                evidence_count: u32,
                last_updated: &str| Case {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        status: status.to_string(),
        location: Some(location.to_string()),
        officer: officer.to_string(),
        priority: priority.to_string(),
        evidence_count,
        last_updated: last_updated.to_string(),
        description: None,
    };

    let evidence = |id: &str,
                    case_id: &str,
                    name: &str,
                    kind: &str,
                    date_collected: &str,
                    collected_by: &str,
                    status: &str,
                    notes: &str| EvidenceItem {
        id: id.to_string(),
        case_id: case_id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        date_collected: date_collected.to_string(),
        collected_by: collected_by.to_string(),
        status: status.to_string(),
        notes: notes.to_string(),
        filename: None,
        size: None,
        sha256: None,
    };

    let log = |id: &str, case_id: &str, user: &str, action: &str, timestamp: &str, details: &str| {
        CollaborationLog {
            id: id.to_string(),
            case_id: case_id.to_string(),
            user: user.to_string(),
            action: action.to_string(),
            timestamp: timestamp.to_string(),
            details: details.to_string(),
        }
    };

    Registry {
        cases: vec![
            case(
                "CASE-001",
                "Bank Robbery - Downtown Branch",
                "2024-03-15",
                "Active",
                "123 Main St, Downtown",
                "Det. Sarah Miller",
                "High",
                8,
                "2024-03-20 14:30",
            ),
            case(
                "CASE-002",
                "Art Gallery Theft",
                "2024-03-10",
                "Under Review",
                "456 Art Ave, Uptown",
                "Det. James Wilson",
                "Medium",
                12,
                "2024-03-19 09:15",
            ),
            case(
                "CASE-003",
                "Cyber Fraud Investigation",
                "2024-03-05",
                "Closed",
                "Virtual/Online",
                "Det. Alex Chen",
                "High",
                23,
                "2024-03-18 16:45",
            ),
        ],
        evidence: vec![
            evidence(
                "EVD-001",
                "CASE-001",
                "Surveillance Footage - Entrance",
                "Video",
                "2024-03-15 10:30",
                "Officer Rodriguez",
                "Processed",
                "Shows suspect entering bank",
            ),
            evidence(
                "EVD-002",
                "CASE-001",
                "Fingerprint Sample A",
                "Image",
                "2024-03-15 11:15",
                "Forensic Tech Kim",
                "Analyzed",
                "Partial print from counter",
            ),
            evidence(
                "EVD-003",
                "CASE-002",
                "Security System Logs",
                "Document",
                "2024-03-10 21:00",
                "Det. Wilson",
                "Processing",
                "System was tampered with",
            ),
        ],
        logs: vec![
            log(
                "LOG-001",
                "CASE-001",
                "Det. Sarah Miller",
                "Added new evidence",
                "2024-03-20 14:30",
                "Uploaded surveillance footage from ATM camera",
            ),
            log(
                "LOG-002",
                "CASE-001",
                "Forensic Analyst Chen",
                "Completed analysis",
                "2024-03-20 10:15",
                "Fingerprint match found in database",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_data() {
        let service = CaseService::with_sample_data();
        assert_eq!(service.list_cases().await.len(), 3);
        assert_eq!(service.evidence_for_case("CASE-001").await.len(), 2);
        assert_eq!(service.list_collaboration().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_case_ids() {
        let service = CaseService::with_sample_data();
        let case = service
            .create_case(NewCase {
                title: "Warehouse Fire".into(),
                date: "2024-04-01".into(),
                location: None,
                description: Some("Suspected arson".into()),
            })
            .await;

        assert_eq!(case.id, "CASE-103");
        assert_eq!(case.status, "Active");
        assert_eq!(case.evidence_count, 0);
        assert!(service.get_case("CASE-103").await.is_some());

        let empty = CaseService::new();
        let first = empty
            .create_case(NewCase {
                title: "t".into(),
                date: "d".into(),
                location: None,
                description: None,
            })
            .await;
        assert_eq!(first.id, "CASE-100");
    }

    #[tokio::test]
    async fn test_record_evidence_updates_case() {
        let service = CaseService::with_sample_data();
        let item = service
            .record_evidence(NewEvidence {
                case_id: "CASE-002".into(),
                name: "glass_shard.jpeg".into(),
                filename: Some("abc_glass_shard.jpeg".into()),
                size: Some(42),
                sha256: None,
                notes: "Found near window".into(),
            })
            .await;

        assert_eq!(item.id, "EVD-103");
        assert_eq!(item.kind, "JPEG");
        assert_eq!(item.status, "Uploaded");
        assert_eq!(service.get_case("CASE-002").await.unwrap().evidence_count, 13);
        assert_eq!(service.evidence_for_case("CASE-002").await.len(), 2);
    }

    #[tokio::test]
    async fn test_evidence_for_unknown_case_is_recorded() {
        let service = CaseService::new();
        service
            .record_evidence(NewEvidence {
                case_id: "CASE-999".into(),
                name: "note.txt".into(),
                filename: None,
                size: None,
                sha256: None,
                notes: String::new(),
            })
            .await;
        assert_eq!(service.list_evidence().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_collaboration_defaults_user() {
        let service = CaseService::with_sample_data();
        let log = service
            .add_collaboration(NewCollaboration {
                case_id: "CASE-001".into(),
                user: None,
                action: "Reviewed footage".into(),
                details: "Second suspect visible".into(),
            })
            .await;

        assert_eq!(log.id, "LOG-102");
        assert_eq!(log.user, "User");
    }

    #[test]
    fn test_evidence_kind() {
        assert_eq!(evidence_kind("scene.png"), "PNG");
        assert_eq!(evidence_kind("README"), "README");
    }
}
