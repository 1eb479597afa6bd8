use super::{FileCandidate, IntakeDecision, classify};
use std::collections::HashSet;

/// Maximum evidence file size: 50 MB
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB

/// Extensions admitted for evidence intake: images, video, documents
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif",
    // Video
    "mp4", "mov", "avi",
    // Documents
    "pdf", "txt", "doc", "docx",
];

/// Admission rules applied to every candidate of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePolicy {
    pub max_size_bytes: u64,
    pub allowed_extensions: HashSet<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: MAX_FILE_SIZE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl IntakePolicy {
    /// Builds a policy from user-supplied extensions. Leading dots and case
    /// are normalised away and blank entries dropped.
    pub fn new<I, S>(max_size_bytes: u64, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            max_size_bytes,
            allowed_extensions,
        }
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(&extension.to_lowercase())
    }

    pub fn classify(&self, candidate: FileCandidate) -> IntakeDecision {
        classify(candidate, self.max_size_bytes, &self.allowed_extensions)
    }

    pub fn validate_batch(
        &self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> Vec<IntakeDecision> {
        super::validate_batch(candidates, self.max_size_bytes, &self.allowed_extensions)
    }

    /// Allow-list in a stable order, for logs and API responses.
    pub fn sorted_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.allowed_extensions.iter().cloned().collect();
        extensions.sort();
        extensions
    }
}
