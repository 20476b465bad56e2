use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job description the user pasted in. Clients usually pick the id;
/// one is generated when they don't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default = "generate_job_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
}

fn generate_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// A resume file held in memory until it is forwarded to the backend.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
    pub uploaded_at: DateTime<Utc>,
}

/// What the session reports about an upload; the bytes stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeUploadSummary {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ResumeUpload> for ResumeUploadSummary {
    fn from(upload: &ResumeUpload) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size_bytes: upload.bytes.len(),
            uploaded_at: upload.uploaded_at,
        }
    }
}
