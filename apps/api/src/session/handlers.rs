//! Axum route handlers for the matching session.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::session::{JobDescription, ResumeUpload};
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetJobDescriptionsRequest {
    pub job_descriptions: Vec<JobDescription>,
}

/// Parts of a resume-processing multipart form.
#[derive(Debug, Default)]
pub struct ResumeForm {
    pub upload: Option<ResumeUpload>,
    /// Raw `jobs` field: a JSON array of job descriptions.
    pub jobs: Option<String>,
}

/// Reads the `resume` file and optional `jobs` text field from a multipart body.
pub async fn read_resume_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume file: {e}")))?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("Resume file is empty".to_string()));
                }
                form.upload = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                    uploaded_at: Utc::now(),
                });
            }
            Some("jobs") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid jobs field: {e}")))?;
                form.jobs = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// GET /api/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.read().await.snapshot())
}

/// PUT /api/session/job-descriptions
pub async fn handle_set_job_descriptions(
    State(state): State<AppState>,
    Json(req): Json<SetJobDescriptionsRequest>,
) -> Json<SessionSnapshot> {
    let mut session = state.session.write().await;
    let kept = session.set_job_descriptions(req.job_descriptions);
    info!("Session job descriptions set ({kept} kept)");
    Json(session.snapshot())
}

/// POST /api/session/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let upload = read_resume_form(multipart)
        .await?
        .upload
        .ok_or_else(|| AppError::Validation("Multipart field 'resume' is required".to_string()))?;

    info!(
        "Session resume uploaded: '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let mut session = state.session.write().await;
    session.set_resume_file(upload);
    Ok(Json(session.snapshot()))
}

/// POST /api/session/process
///
/// Forwards the session's resume and job descriptions to the backend and
/// stores the response. The call runs on its own task, so the outcome is
/// recorded on the session even if the client goes away mid-request.
pub async fn handle_process(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let input = state.session.write().await.begin_processing()?;
    let run = input.run;

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let outcome = task_state
            .backend
            .process_resume(&input.upload, &input.jobs)
            .await;

        let recorded = match &outcome {
            Ok(response) => Ok(response.clone()),
            Err(e) => {
                warn!("Resume processing failed: {e}");
                Err(e.to_string())
            }
        };

        let mut session = task_state.session.write().await;
        if !session.finish_processing(run, recorded) {
            info!("Discarding outcome of superseded processing run {run}");
        }
        (outcome, session.snapshot())
    });

    let (outcome, snapshot) = match task.await {
        Ok(done) => done,
        Err(e) => {
            state
                .session
                .write()
                .await
                .finish_processing(run, Err("Resume processing was interrupted".to_string()));
            return Err(AppError::Internal(anyhow::anyhow!(
                "processing task failed: {e}"
            )));
        }
    };

    match outcome {
        Ok(_) => Ok(Json(snapshot)),
        Err(e) => Err(AppError::Backend(e)),
    }
}

/// DELETE /api/session/response
pub async fn handle_clear_response(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.write().await;
    session.clear_response();
    Json(session.snapshot())
}

/// DELETE /api/session
pub async fn handle_reset_session(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.reset();
    info!("Session reset");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tokio::sync::Notify;

    use super::*;
    use crate::backend::{BackendError, ResumeBackend};
    use crate::config::Config;

    /// Holds every resume call until `release` is notified.
    struct GatedBackend {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ResumeBackend for GatedBackend {
        async fn process_resume(
            &self,
            upload: &ResumeUpload,
            _jobs: &[JobDescription],
        ) -> Result<Value, BackendError> {
            self.release.notified().await;
            Ok(json!({ "file": upload.file_name }))
        }

        async fn service_keys(&self) -> Result<Value, BackendError> {
            Ok(json!({}))
        }

        async fn upload_job_descriptions(
            &self,
            _descriptions: &[String],
            _resume_id: &str,
        ) -> Result<String, BackendError> {
            Ok("job-1".to_string())
        }

        async fn improve_resume(
            &self,
            _resume_id: &str,
            _job_id: &str,
        ) -> Result<Value, BackendError> {
            Ok(json!({}))
        }
    }

    async fn ready_state(release: Arc<Notify>) -> AppState {
        let config = Config {
            backend_url: "http://backend.test".to_string(),
            backend_timeout_secs: 5,
            port: 0,
            rust_log: "info".to_string(),
        };
        let state = AppState::new(config, Arc::new(GatedBackend { release }));
        {
            let mut session = state.session.write().await;
            session.set_resume_file(ResumeUpload {
                file_name: "cv.pdf".to_string(),
                content_type: None,
                bytes: Bytes::from_static(b"%PDF"),
                uploaded_at: Utc::now(),
            });
            session.set_job_descriptions(vec![JobDescription {
                id: "a".to_string(),
                description: "Rust engineer".to_string(),
            }]);
        }
        state
    }

    async fn wait_until_idle(state: &AppState) {
        for _ in 0..100 {
            if !state.session.read().await.snapshot().is_backend_processing {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session stayed busy");
    }

    #[tokio::test]
    async fn test_dropped_request_still_finishes_processing() {
        let release = Arc::new(Notify::new());
        let state = ready_state(release.clone()).await;

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            handle_process(State(state.clone())),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(state.session.read().await.snapshot().is_backend_processing);

        release.notify_one();
        wait_until_idle(&state).await;
        assert_eq!(
            state.session.read().await.snapshot().resume_processor_response,
            Some(json!({ "file": "cv.pdf" }))
        );

        release.notify_one();
        let Json(snapshot) = handle_process(State(state.clone())).await.unwrap();
        assert!(!snapshot.is_backend_processing);
    }

    #[tokio::test]
    async fn test_reset_during_processing_discards_outcome() {
        let release = Arc::new(Notify::new());
        let state = ready_state(release.clone()).await;

        let pending = tokio::spawn(handle_process(State(state.clone())));
        for _ in 0..100 {
            if state.session.read().await.snapshot().is_backend_processing {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle_reset_session(State(state.clone())).await;

        release.notify_one();
        let Json(snapshot) = pending.await.unwrap().unwrap();
        assert!(snapshot.resume_processor_response.is_none());
        assert!(snapshot.resume_file.is_none());
        assert!(!snapshot.is_backend_processing);
    }
}
