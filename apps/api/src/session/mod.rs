//! Matching session — the per-process state the web client drives: the
//! uploaded resume, the job descriptions, and the last backend response.
//!
//! Lives in `AppState` behind a `tokio::sync::RwLock`. The lock is never held
//! across the backend call: `begin_processing` snapshots the inputs and
//! `finish_processing` records the outcome. Each call gets a run id, and an
//! outcome is only recorded for the run that is still current.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::session::{JobDescription, ResumeUpload, ResumeUploadSummary};

pub mod handlers;

pub const MISSING_INPUTS_MESSAGE: &str =
    "Please upload a resume and add at least one job description before continuing.";

#[derive(Debug, Default)]
pub struct MatchSession {
    resume_file: Option<ResumeUpload>,
    job_descriptions: Vec<JobDescription>,
    last_response: Option<Value>,
    is_processing: bool,
    processing_error: Option<String>,
    /// Id of the latest run. Survives `reset`.
    run: u64,
}

/// Inputs captured for one backend call.
#[derive(Debug, Clone)]
pub struct ProcessingInput {
    pub run: u64,
    pub upload: ResumeUpload,
    pub jobs: Vec<JobDescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub resume_file: Option<ResumeUploadSummary>,
    pub job_descriptions: Vec<JobDescription>,
    pub resume_processor_response: Option<Value>,
    pub is_backend_processing: bool,
    pub processing_error: Option<String>,
}

impl MatchSession {
    pub fn set_resume_file(&mut self, upload: ResumeUpload) {
        self.resume_file = Some(upload);
    }

    /// Replaces the job descriptions, dropping blank ones. Returns how many were kept.
    pub fn set_job_descriptions(&mut self, jobs: Vec<JobDescription>) -> usize {
        self.job_descriptions = jobs
            .into_iter()
            .filter(|j| !j.description.trim().is_empty())
            .collect();
        self.job_descriptions.len()
    }

    /// Marks the session busy and hands back the inputs to forward.
    ///
    /// Fails without touching the backend when a call is already running, or
    /// when the file or job descriptions are missing; the latter is also
    /// recorded as the session's processing error.
    pub fn begin_processing(&mut self) -> Result<ProcessingInput, AppError> {
        if self.is_processing {
            return Err(AppError::Conflict(
                "Resume processing is already in progress".to_string(),
            ));
        }

        let upload = match &self.resume_file {
            Some(upload) if !self.job_descriptions.is_empty() => upload.clone(),
            _ => {
                self.processing_error = Some(MISSING_INPUTS_MESSAGE.to_string());
                self.is_processing = false;
                return Err(AppError::Validation(MISSING_INPUTS_MESSAGE.to_string()));
            }
        };

        self.run += 1;
        self.is_processing = true;
        self.processing_error = None;
        self.last_response = None;

        Ok(ProcessingInput {
            run: self.run,
            upload,
            jobs: self.job_descriptions.clone(),
        })
    }

    /// Records the outcome of `run`. Returns false, leaving the session
    /// untouched, when that run was superseded by a reset.
    pub fn finish_processing(&mut self, run: u64, outcome: Result<Value, String>) -> bool {
        if !self.is_processing || run != self.run {
            return false;
        }
        match outcome {
            Ok(response) => {
                self.last_response = Some(response);
                self.processing_error = None;
            }
            Err(message) => self.processing_error = Some(message),
        }
        self.is_processing = false;
        true
    }

    pub fn clear_response(&mut self) {
        self.last_response = None;
    }

    pub fn reset(&mut self) {
        let run = self.run;
        *self = Self {
            run,
            ..Self::default()
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            resume_file: self.resume_file.as_ref().map(ResumeUploadSummary::from),
            job_descriptions: self.job_descriptions.clone(),
            resume_processor_response: self.last_response.clone(),
            is_backend_processing: self.is_processing,
            processing_error: self.processing_error.clone(),
        }
    }
}
