pub mod policy;
pub mod session;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;

pub use policy::{ALLOWED_EXTENSIONS, IntakePolicy, MAX_FILE_SIZE};

/// A file the user has selected or dropped, not yet admitted to the upload list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileCandidate {
    pub name: String,
    pub size_bytes: u64,
    /// Lower-cased text after the last `.` of `name`; empty when there is none.
    pub extension: String,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            size_bytes,
            extension,
        }
    }
}

/// Extracts the lower-cased extension of a file name.
///
/// `"PHOTO.JPG"` yields `"jpg"`, `"archive.tar.gz"` yields `"gz"`, and names
/// without a dot (or ending in one) yield an empty string.
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    TooLarge,
    UnsupportedType,
}

impl RejectionReason {
    /// User-facing text for a rejected candidate.
    pub fn message(&self, candidate: &FileCandidate, max_size_bytes: u64) -> String {
        match self {
            RejectionReason::TooLarge => format!(
                "File too large: {}. Max size is {}MB.",
                candidate.name,
                max_size_bytes / 1024 / 1024
            ),
            RejectionReason::UnsupportedType => {
                format!("Invalid file type: {}", candidate.name)
            }
        }
    }
}

/// Marks a decision as produced by [`classify`]. It cannot be built outside
/// this module, so an `Accepted` decision cannot be forged.
///
/// ```compile_fail
/// use evidence_intake::intake::{Admitted, FileCandidate, IntakeDecision};
///
/// let forged = IntakeDecision::Accepted {
///     candidate: FileCandidate::new("payload.exe", 1),
///     admitted: Admitted(()),
/// };
/// ```
///
/// ```compile_fail
/// use evidence_intake::intake::IntakeDecision;
///
/// let forged: IntakeDecision = serde_json::from_str(
///     r#"{"decision":"accepted","candidate":{"name":"payload.exe","size_bytes":1,"extension":"exe"}}"#,
/// ).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admitted(());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum IntakeDecision {
    Accepted {
        candidate: FileCandidate,
        #[serde(skip)]
        admitted: Admitted,
    },
    Rejected {
        candidate: FileCandidate,
        reason: RejectionReason,
    },
}

impl IntakeDecision {
    pub fn candidate(&self) -> &FileCandidate {
        match self {
            IntakeDecision::Accepted { candidate, .. } => candidate,
            IntakeDecision::Rejected { candidate, .. } => candidate,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, IntakeDecision::Accepted { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Index {index} is out of range for an intake list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Classifies a single candidate. The size limit is checked before the type,
/// and extensions match the allow-list regardless of case.
pub fn classify(
    candidate: FileCandidate,
    max_size_bytes: u64,
    allowed_extensions: &HashSet<String>,
) -> IntakeDecision {
    if candidate.size_bytes > max_size_bytes {
        return IntakeDecision::Rejected {
            candidate,
            reason: RejectionReason::TooLarge,
        };
    }

    let allowed = allowed_extensions
        .iter()
        .any(|e| e.to_lowercase() == candidate.extension);
    if !allowed {
        return IntakeDecision::Rejected {
            candidate,
            reason: RejectionReason::UnsupportedType,
        };
    }

    IntakeDecision::Accepted {
        candidate,
        admitted: Admitted(()),
    }
}

/// Classifies every candidate of a batch independently, preserving input order.
pub fn validate_batch(
    candidates: impl IntoIterator<Item = FileCandidate>,
    max_size_bytes: u64,
    allowed_extensions: &HashSet<String>,
) -> Vec<IntakeDecision> {
    candidates
        .into_iter()
        .map(|c| classify(c, max_size_bytes, allowed_extensions))
        .collect()
}

/// Ordered list of accepted candidates staged for upload.
///
/// Entries can only get in through [`IntakeList::append_accepted`], which
/// takes decisions only [`classify`] can produce, so every entry has passed
/// validation. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntakeList {
    entries: Vec<FileCandidate>,
}

impl IntakeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the candidate of an `Accepted` decision. Returns whether the
    /// list changed; a `Rejected` decision leaves it untouched.
    pub fn append_accepted(&mut self, decision: &IntakeDecision) -> bool {
        match decision {
            IntakeDecision::Accepted { candidate, .. } => {
                self.entries.push(candidate.clone());
                true
            }
            IntakeDecision::Rejected { .. } => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Result<FileCandidate, IntakeError> {
        if index >= self.entries.len() {
            return Err(IntakeError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[FileCandidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|c| c.size_bytes).sum()
    }
}

impl IntoIterator for IntakeList {
    type Item = FileCandidate;
    type IntoIter = std::vec::IntoIter<FileCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Value-style counterpart of [`IntakeList::append_accepted`].
pub fn append_accepted(mut list: IntakeList, decision: &IntakeDecision) -> IntakeList {
    list.append_accepted(decision);
    list
}

/// Returns a copy of `list` without the entry at `index`; `list` itself is
/// never modified.
pub fn remove_at(list: &IntakeList, index: usize) -> Result<IntakeList, IntakeError> {
    let mut next = list.clone();
    next.remove_at(index)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> HashSet<String> {
        ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.jpg"), "jpg");
        assert_eq!(extension_of("PHOTO.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn test_validate_batch_mixed() {
        let decisions = validate_batch(
            vec![
                FileCandidate::new("a.png", 1000),
                FileCandidate::new("b.exe", 1000),
                FileCandidate::new("c.png", 60_000_000),
            ],
            52_428_800,
            &allow_list(),
        );

        assert_eq!(
            decisions,
            vec![
                IntakeDecision::Accepted {
                    candidate: FileCandidate::new("a.png", 1000),
                    admitted: Admitted(())
                },
                IntakeDecision::Rejected {
                    candidate: FileCandidate::new("b.exe", 1000),
                    reason: RejectionReason::UnsupportedType
                },
                IntakeDecision::Rejected {
                    candidate: FileCandidate::new("c.png", 60_000_000),
                    reason: RejectionReason::TooLarge
                },
            ]
        );
    }

    #[test]
    fn test_size_checked_before_type() {
        let decisions = validate_batch(
            vec![FileCandidate::new("huge.exe", MAX_FILE_SIZE + 1)],
            MAX_FILE_SIZE,
            &allow_list(),
        );
        assert!(matches!(
            decisions[0],
            IntakeDecision::Rejected {
                reason: RejectionReason::TooLarge,
                ..
            }
        ));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let allowed = allow_list();
        assert!(classify(FileCandidate::new("edge.pdf", MAX_FILE_SIZE), MAX_FILE_SIZE, &allowed).is_accepted());
        assert!(!classify(FileCandidate::new("edge.pdf", MAX_FILE_SIZE + 1), MAX_FILE_SIZE, &allowed).is_accepted());
    }

    #[test]
    fn test_case_insensitive_extensions() {
        let allowed = allow_list();
        assert!(classify(FileCandidate::new("PHOTO.JPG", 10), MAX_FILE_SIZE, &allowed).is_accepted());
        assert!(classify(FileCandidate::new("photo.jpg", 10), MAX_FILE_SIZE, &allowed).is_accepted());
        assert!(classify(FileCandidate::new("Report.DocX", 10), MAX_FILE_SIZE, &allowed).is_accepted());
    }

    #[test]
    fn test_upper_case_allow_list() {
        let allowed: HashSet<String> = ["JPG".to_string()].into_iter().collect();
        let decisions = validate_batch(
            vec![
                FileCandidate::new("photo.JPG", 1),
                FileCandidate::new("photo.jpg", 1),
                FileCandidate::new("photo.png", 1),
            ],
            MAX_FILE_SIZE,
            &allowed,
        );
        assert!(decisions[0].is_accepted());
        assert!(decisions[1].is_accepted());
        assert!(!decisions[2].is_accepted());
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let decision = classify(FileCandidate::new("README", 10), MAX_FILE_SIZE, &allow_list());
        assert_eq!(
            decision,
            IntakeDecision::Rejected {
                candidate: FileCandidate::new("README", 10),
                reason: RejectionReason::UnsupportedType
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(validate_batch(Vec::new(), MAX_FILE_SIZE, &allow_list()).is_empty());
    }

    #[test]
    fn test_append_accepted_only() {
        let allowed = allow_list();
        let mut list = IntakeList::new();
        let accepted = classify(FileCandidate::new("a.png", 1), MAX_FILE_SIZE, &allowed);
        let rejected = classify(FileCandidate::new("b.exe", 1), MAX_FILE_SIZE, &allowed);

        assert!(list.append_accepted(&accepted));
        assert!(!list.append_accepted(&rejected));
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].name, "a.png");
    }

    #[test]
    fn test_accepted_decisions_keep_their_verdict_in_json() {
        let decision = classify(FileCandidate::new("a.png", 1), MAX_FILE_SIZE, &allow_list());
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "accepted");
        assert_eq!(json["candidate"]["name"], "a.png");
        assert!(json.get("admitted").is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let decision = classify(FileCandidate::new("a.png", 1), MAX_FILE_SIZE, &allow_list());
        let list = append_accepted(append_accepted(IntakeList::new(), &decision), &decision);
        assert_eq!(list.len(), 2);
        assert_eq!(list.total_bytes(), 2);
    }

    #[test]
    fn test_remove_at() {
        let allowed = allow_list();
        let mut list = IntakeList::new();
        for name in ["a.png", "b.pdf", "c.txt"] {
            list.append_accepted(&classify(FileCandidate::new(name, 1), MAX_FILE_SIZE, &allowed));
        }

        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.name, "b.pdf");
        let names: Vec<_> = list.entries().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.txt"]);
    }

    #[test]
    fn test_remove_at_out_of_range_leaves_list_unchanged() {
        let allowed = allow_list();
        let mut list = IntakeList::new();
        list.append_accepted(&classify(FileCandidate::new("a.png", 1), MAX_FILE_SIZE, &allowed));
        list.append_accepted(&classify(FileCandidate::new("b.png", 2), MAX_FILE_SIZE, &allowed));
        let before = list.clone();

        let err = list.remove_at(5).unwrap_err();
        assert_eq!(err, IntakeError::IndexOutOfRange { index: 5, len: 2 });
        assert_eq!(list, before);

        assert!(remove_at(&before, 2).is_err());
        assert_eq!(remove_at(&before, 0).unwrap().len(), 1);
        assert_eq!(before.len(), 2);
    }

    #[test]
    fn test_rejection_messages() {
        let candidate = FileCandidate::new("big.mov", 1);
        assert_eq!(
            RejectionReason::TooLarge.message(&candidate, MAX_FILE_SIZE),
            "File too large: big.mov. Max size is 50MB."
        );
        assert_eq!(
            RejectionReason::UnsupportedType.message(&candidate, MAX_FILE_SIZE),
            "Invalid file type: big.mov"
        );
    }
}
