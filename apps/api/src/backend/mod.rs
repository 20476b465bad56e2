/// Backend client — the single point of entry for calls to the external
/// resume-processing backend.
///
/// Parsing, keyword extraction and scoring all happen on the backend; this
/// module only forwards requests and turns failures into `BackendError`s.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Response,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::session::{JobDescription, ResumeUpload};

pub mod handlers;

const RESUME_PROCESSOR_PATH: &str = "/api/resume-processor";
const SERVICE_KEYS_PATH: &str = "/api/service-keys";
const JOBS_UPLOAD_PATH: &str = "/api/v1/jobs/upload";
const IMPROVE_PATH: &str = "/api/v1/resumes/improve";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to reach backend: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded with status {status}")]
    Status { status: u16, details: String },

    #[error("Unexpected content type from backend response.")]
    UnexpectedContentType { details: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// The backend refused the request; `message` is already user-facing.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    /// Raw backend output worth surfacing next to the message, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            BackendError::Status { details, .. }
            | BackendError::UnexpectedContentType { details } => Some(details.clone()),
            _ => None,
        }
    }

    /// HTTP status the backend answered with, when it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } | BackendError::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// The backend seam. `AppState` carries an `Arc<dyn ResumeBackend>` so the
/// HTTP client can be replaced in tests.
#[async_trait]
pub trait ResumeBackend: Send + Sync {
    /// Submits a resume file plus job descriptions for matching.
    async fn process_resume(
        &self,
        upload: &ResumeUpload,
        jobs: &[JobDescription],
    ) -> Result<Value, BackendError>;

    async fn service_keys(&self) -> Result<Value, BackendError>;

    /// Uploads job descriptions for a stored resume and returns the job id.
    async fn upload_job_descriptions(
        &self,
        descriptions: &[String],
        resume_id: &str,
    ) -> Result<String, BackendError>;

    async fn improve_resume(&self, resume_id: &str, job_id: &str) -> Result<Value, BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` must already be normalized (no trailing slash).
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ResumeBackend for HttpBackend {
    async fn process_resume(
        &self,
        upload: &ResumeUpload,
        jobs: &[JobDescription],
    ) -> Result<Value, BackendError> {
        let mut part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("resume", part)
            .text("jobs", serde_json::to_string(jobs)?);

        debug!(
            "Forwarding resume '{}' ({} bytes) with {} job description(s)",
            upload.file_name,
            upload.bytes.len(),
            jobs.len()
        );

        let response = self
            .client
            .post(self.url(RESUME_PROCESSOR_PATH))
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        read_json(response).await
    }

    async fn service_keys(&self) -> Result<Value, BackendError> {
        let response = self
            .client
            .get(self.url(SERVICE_KEYS_PATH))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn upload_job_descriptions(
        &self,
        descriptions: &[String],
        resume_id: &str,
    ) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url(JOBS_UPLOAD_PATH))
            .json(&json!({
                "job_descriptions": descriptions,
                "resume_id": resume_id,
            }))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: Value = response.json().await?;
        debug!("Job upload response: {body}");
        extract_job_id(&body)
    }

    async fn improve_resume(&self, resume_id: &str, job_id: &str) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.url(IMPROVE_PATH))
            .json(&json!({ "resume_id": resume_id, "job_id": job_id }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Improve failed with status {status}: {text}");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message: improve_error_message(status.as_u16(), &text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let details = response.text().await.unwrap_or_default();
    warn!("Backend returned {status}: {details}");
    Err(BackendError::Status {
        status: status.as_u16(),
        details,
    })
}

async fn read_json(response: Response) -> Result<Value, BackendError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if !is_json {
        let details = response.text().await.unwrap_or_default();
        return Err(BackendError::UnexpectedContentType { details });
    }

    Ok(response.json().await?)
}

/// Reads the job id out of a jobs-upload response.
/// The backend returns `job_id` as a list; a bare string is accepted too.
fn extract_job_id(body: &Value) -> Result<String, BackendError> {
    let job_id = match body.get("job_id") {
        Some(Value::Array(ids)) => ids.first().and_then(Value::as_str),
        Some(Value::String(id)) => Some(id.as_str()),
        _ => None,
    };

    job_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BackendError::MalformedResponse(format!("expected a non-empty job_id in {body}"))
        })
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Turns an improve failure body into a message fit for end users.
fn improve_error_message(status: u16, body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.to_string();
    };

    let Some(detail) = parsed
        .detail
        .as_ref()
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
    else {
        return format!("Improve failed with status {status}");
    };

    if detail.contains("Parsing of job with ID") {
        "The job description could not be parsed. Please upload it again or check its format."
            .to_string()
    } else if detail.contains("Keyword extraction failed for job") {
        "No keywords could be extracted from the job description. Make sure it lists enough requirements and skills, then upload it again.".to_string()
    } else if detail.contains("Keyword extraction failed for resume") {
        "No keywords could be extracted from the resume. Please upload the resume again."
            .to_string()
    } else if detail.contains("Resume not found") {
        "Resume not found. Please upload the resume again.".to_string()
    } else if detail.contains("Job not found") {
        "Job description not found. Please upload the job description again.".to_string()
    } else {
        detail.to_string()
    }
}
