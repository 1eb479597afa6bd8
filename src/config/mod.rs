use crate::intake::{ALLOWED_EXTENSIONS, IntakePolicy, MAX_FILE_SIZE};
use std::env;
use std::path::PathBuf;

/// Intake configuration for evidence uploads
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Maximum evidence file size in bytes (default: 50 MB)
    pub max_file_size: u64,

    /// Extensions admitted for upload (default: png, jpg, jpeg, gif, mp4, mov, avi, pdf, txt, doc, docx)
    pub allowed_extensions: Vec<String>,

    /// Maximum size of one upload request, all files included (default: 256 MB)
    pub max_request_size: usize,

    /// Directory evidence files are stored in (default: "uploads")
    pub upload_dir: PathBuf,

    /// Load the demonstration cases on startup (default: true)
    pub seed_sample_data: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_request_size: 256 * 1024 * 1024, // 256 MB
            upload_dir: PathBuf::from("uploads"),
            seed_sample_data: true,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .ok()
                .map(|v| parse_extension_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(default.allowed_extensions),

            max_request_size: env::var("MAX_REQUEST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_request_size),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.seed_sample_data),
        }
    }

    /// Create config for development and tests (temporary upload directory, no sample data)
    pub fn development(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            seed_sample_data: false,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> IntakePolicy {
        IntakePolicy::new(self.max_file_size, &self.allowed_extensions)
    }
}

fn parse_extension_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
