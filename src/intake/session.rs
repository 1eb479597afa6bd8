use super::{FileCandidate, IntakeDecision, IntakeError, IntakeList, IntakePolicy};
use crate::utils::format::format_file_size;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Surface that shows messages to the user.
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

/// A rendered row of the staged-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StagedFile {
    pub name: String,
    pub size: String,
}

impl From<&FileCandidate> for StagedFile {
    fn from(candidate: &FileCandidate) -> Self {
        Self {
            name: candidate.name.clone(),
            size: format_file_size(candidate.size_bytes),
        }
    }
}

/// Surface that renders the staged-files list. Indices match the
/// [`IntakeList`] positions.
pub trait ListView {
    fn display(&mut self, file: &StagedFile);
    fn remove(&mut self, index: usize);
}

/// List view that keeps the rendered rows, for returning them to a client.
#[derive(Debug, Default, Clone)]
pub struct StagedRows {
    rows: Vec<StagedFile>,
}

impl StagedRows {
    pub fn rows(&self) -> &[StagedFile] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<StagedFile> {
        self.rows
    }
}

impl ListView for StagedRows {
    fn display(&mut self, file: &StagedFile) {
        self.rows.push(file.clone());
    }

    fn remove(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }
}

/// Owns the intake list for one page view and routes validation results to
/// the view and notifier. Nothing is shared between sessions.
pub struct IntakeSession<V, N> {
    policy: IntakePolicy,
    list: IntakeList,
    view: V,
    notifier: N,
}

impl<V: ListView, N: Notifier> IntakeSession<V, N> {
    pub fn new(policy: IntakePolicy, view: V, notifier: N) -> Self {
        Self {
            policy,
            list: IntakeList::new(),
            view,
            notifier,
        }
    }

    /// Processes one selection or drop. Rejections are reported one by one
    /// and never stop the rest of the batch.
    pub fn submit_batch(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> Vec<IntakeDecision> {
        let decisions = self.policy.validate_batch(candidates);

        for decision in &decisions {
            match decision {
                IntakeDecision::Accepted { candidate, .. } => {
                    self.list.append_accepted(decision);
                    self.view.display(&StagedFile::from(candidate));
                }
                IntakeDecision::Rejected { candidate, reason } => {
                    tracing::debug!("Rejected {}: {:?}", candidate.name, reason);
                    let message = reason.message(candidate, self.policy.max_size_bytes);
                    self.notifier.notify(&message, NotificationKind::Error);
                }
            }
        }

        decisions
    }

    pub fn remove(&mut self, index: usize) -> Result<FileCandidate, IntakeError> {
        let removed = self.list.remove_at(index)?;
        self.view.remove(index);
        Ok(removed)
    }

    pub fn list(&self) -> &IntakeList {
        &self.list
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_parts(self) -> (IntakeList, V, N) {
        (self.list, self.view, self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification::RecordingNotifier;

    fn session() -> IntakeSession<StagedRows, RecordingNotifier> {
        IntakeSession::new(
            IntakePolicy::default(),
            StagedRows::default(),
            RecordingNotifier::default(),
        )
    }

    #[test]
    fn test_submit_batch_routes_decisions() {
        let mut session = session();
        let decisions = session.submit_batch(vec![
            FileCandidate::new("scene.jpg", 2048),
            FileCandidate::new("payload.exe", 10),
            FileCandidate::new("footage.mp4", 60_000_000),
            FileCandidate::new("report.pdf", 0),
        ]);

        assert_eq!(decisions.len(), 4);
        assert_eq!(session.list().len(), 2);

        let (list, view, notifier) = session.into_parts();
        assert_eq!(list.entries()[0].name, "scene.jpg");
        assert_eq!(list.entries()[1].name, "report.pdf");
        assert_eq!(
            view.rows(),
            &[
                StagedFile { name: "scene.jpg".into(), size: "2 KB".into() },
                StagedFile { name: "report.pdf".into(), size: "0 Bytes".into() },
            ]
        );

        let messages: Vec<_> = notifier.notifications().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid file type: payload.exe",
                "File too large: footage.mp4. Max size is 50MB.",
            ]
        );
        assert!(notifier.notifications().iter().all(|n| n.kind == NotificationKind::Error));
    }

    #[test]
    fn test_batches_accumulate() {
        let mut session = session();
        session.submit_batch(vec![FileCandidate::new("a.png", 1)]);
        session.submit_batch(vec![FileCandidate::new("a.png", 1)]);
        assert_eq!(session.list().len(), 2);
    }

    #[test]
    fn test_remove_updates_view() {
        let mut session = session();
        session.submit_batch(vec![
            FileCandidate::new("a.png", 1),
            FileCandidate::new("b.png", 1),
        ]);

        let removed = session.remove(0).unwrap();
        assert_eq!(removed.name, "a.png");

        let err = session.remove(5).unwrap_err();
        assert_eq!(err, IntakeError::IndexOutOfRange { index: 5, len: 1 });

        let (list, view, _) = session.into_parts();
        assert_eq!(list.len(), 1);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].name, "b.png");
    }
}
