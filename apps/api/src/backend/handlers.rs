//! Axum route handlers that forward straight to the resume-processing backend.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::models::session::JobDescription;
use crate::session::handlers::read_resume_form;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobUploadRequest {
    pub job_descriptions: Vec<String>,
    pub resume_id: String,
}

#[derive(Debug, Serialize)]
pub struct JobUploadResponse {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub resume_id: String,
    pub job_id: String,
}

/// POST /api/resume-processor
///
/// Multipart `resume` file plus `jobs` (JSON array), forwarded unchanged.
pub async fn handle_resume_processor(
    State(state): State<AppState>,
    multipart: axum::extract::Multipart,
) -> Result<Json<Value>, AppError> {
    let form = read_resume_form(multipart).await?;
    let upload = form
        .upload
        .ok_or_else(|| AppError::Validation("Multipart field 'resume' is required".to_string()))?;
    let jobs: Vec<JobDescription> = match form.jobs.as_deref() {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("'jobs' must be a JSON array: {e}")))?,
        None => Vec::new(),
    };

    let response = state.backend.process_resume(&upload, &jobs).await?;
    Ok(Json(response))
}

/// GET /api/service-keys
///
/// Never fails: backend problems come back as an empty key set plus the error.
pub async fn handle_service_keys(State(state): State<AppState>) -> Json<Value> {
    match state.backend.service_keys().await {
        Ok(keys) => Json(keys),
        Err(e) => {
            warn!("Service keys unavailable: {e}");
            let details = e.details().unwrap_or_else(|| e.to_string());
            Json(json!({
                "config_keys": {},
                "error": e.to_string(),
                "details": details,
            }))
        }
    }
}

/// POST /api/v1/jobs/upload
pub async fn handle_upload_jobs(
    State(state): State<AppState>,
    Json(req): Json<JobUploadRequest>,
) -> Result<Json<JobUploadResponse>, AppError> {
    if req.job_descriptions.iter().all(|d| d.trim().is_empty()) {
        return Err(AppError::Validation(
            "At least one job description is required".to_string(),
        ));
    }
    if req.resume_id.trim().is_empty() {
        return Err(AppError::Validation("resume_id cannot be empty".to_string()));
    }

    let job_id = state
        .backend
        .upload_job_descriptions(&req.job_descriptions, &req.resume_id)
        .await?;
    Ok(Json(JobUploadResponse { job_id }))
}

/// POST /api/v1/resumes/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<Value>, AppError> {
    let improved = state
        .backend
        .improve_resume(&req.resume_id, &req.job_id)
        .await?;
    Ok(Json(improved))
}
