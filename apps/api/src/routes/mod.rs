pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::handlers as backend;
use crate::missing_info::handlers as missing_info;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Missing-info API
        .route(
            "/api/v1/resumes/missing-info",
            post(missing_info::handle_audit),
        )
        .route(
            "/api/v1/resumes/missing-info/merge",
            post(missing_info::handle_merge),
        )
        // Matching session
        .route(
            "/api/session",
            get(session::handle_get_session).delete(session::handle_reset_session),
        )
        .route(
            "/api/session/job-descriptions",
            put(session::handle_set_job_descriptions),
        )
        .route("/api/session/resume", post(session::handle_upload_resume))
        .route("/api/session/process", post(session::handle_process))
        .route(
            "/api/session/response",
            delete(session::handle_clear_response),
        )
        // Backend passthrough
        .route(
            "/api/resume-processor",
            post(backend::handle_resume_processor),
        )
        .route("/api/service-keys", get(backend::handle_service_keys))
        .route("/api/v1/jobs/upload", post(backend::handle_upload_jobs))
        .route("/api/v1/resumes/improve", post(backend::handle_improve))
        .with_state(state)
}
