//! Axum route handlers for the missing-info flow.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::missing_info::detector::{detect_missing_info, is_complete};
use crate::missing_info::form::validate_answers;
use crate::missing_info::merge::merge_missing_info;
use crate::missing_info::models::{Answers, MissingField};
use crate::models::resume::ResumeRecord;

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub resume: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub missing_fields: Vec<MissingField>,
    /// No required field is outstanding.
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub resume: ResumeRecord,
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub resume: ResumeRecord,
    /// Audit of the merged resume.
    pub remaining: Vec<MissingField>,
}

/// POST /api/v1/resumes/missing-info
pub async fn handle_audit(Json(req): Json<AuditRequest>) -> Json<AuditResponse> {
    let missing_fields = detect_missing_info(&req.resume);
    debug!("Audit found {} missing field(s)", missing_fields.len());
    Json(AuditResponse {
        complete: is_complete(&missing_fields),
        missing_fields,
    })
}

/// POST /api/v1/resumes/missing-info/merge
///
/// Answers are checked against the fields the resume is missing, exactly as
/// the collection form would, before anything is merged. Answers for fields
/// the resume already has are dropped, so filled values are never overwritten.
pub async fn handle_merge(Json(req): Json<MergeRequest>) -> Result<Json<MergeResponse>, AppError> {
    if req.answers.is_empty() {
        debug!("Merge requested with no answers");
    }

    let fields = detect_missing_info(&req.resume);
    let answers = req.answers.for_fields(&fields);
    if answers.len() < req.answers.len() {
        debug!(
            "Ignoring {} answer(s) for fields that are not missing",
            req.answers.len() - answers.len()
        );
    }

    let validation = validate_answers(&fields, &answers);
    if !validation.passed {
        return Err(AppError::InvalidFields(validation.errors));
    }

    let resume = merge_missing_info(&req.resume, &answers);
    let remaining = detect_missing_info(&resume);
    info!(
        "Merged {} answer(s); {} field(s) still missing",
        answers.len(),
        remaining.len()
    );

    Ok(Json(MergeResponse { resume, remaining }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing_info::models::FieldKey;
    use serde_json::json;

    #[tokio::test]
    async fn test_audit_empty_resume_is_incomplete() {
        let Json(resp) = handle_audit(Json(AuditRequest {
            resume: ResumeRecord::default(),
        }))
        .await;
        assert_eq!(resp.missing_fields.len(), 8);
        assert!(!resp.complete);
    }

    #[tokio::test]
    async fn test_audit_with_only_optional_gaps_is_complete() {
        let resume: ResumeRecord = serde_json::from_value(json!({
            "personal_data": { "firstName": "Ada", "lastName": "Lovelace", "email": "ada@x.com" }
        }))
        .unwrap();
        let Json(resp) = handle_audit(Json(AuditRequest { resume })).await;
        assert!(resp.complete);
        assert!(resp.missing_fields.iter().all(|f| !f.required));
    }

    #[tokio::test]
    async fn test_merge_rejects_invalid_answers() {
        let err = handle_merge(Json(MergeRequest {
            resume: ResumeRecord::default(),
            answers: Answers::new().with(FieldKey::FirstName, "Ada"),
        }))
        .await
        .unwrap_err();

        match err {
            AppError::InvalidFields(errors) => {
                assert!(errors.contains_key("lastName"));
                assert!(errors.contains_key("email"));
                assert!(!errors.contains_key("firstName"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_merge_returns_resume_and_remaining() {
        let answers = Answers::new()
            .with(FieldKey::FirstName, "Ada")
            .with(FieldKey::LastName, "Lovelace")
            .with(FieldKey::Email, "ada@x.com")
            .with(FieldKey::Experience, "Built systems")
            .with(FieldKey::Company, "Acme");
        let Json(resp) = handle_merge(Json(MergeRequest {
            resume: ResumeRecord::default(),
            answers,
        }))
        .await
        .unwrap();

        assert_eq!(resp.resume.email(), Some("ada@x.com"));
        assert_eq!(
            resp.resume.experiences.as_ref().unwrap()[0].company.as_deref(),
            Some("Acme")
        );
        let remaining: Vec<_> = resp.remaining.iter().map(|f| f.field).collect();
        assert_eq!(
            remaining,
            vec![
                FieldKey::Phone,
                FieldKey::City,
                FieldKey::Country,
                FieldKey::Education
            ]
        );
    }

    #[tokio::test]
    async fn test_merge_keeps_existing_contact_details() {
        let resume: ResumeRecord = serde_json::from_value(json!({
            "personal_data": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@x.com",
                "phone": "+15551234"
            }
        }))
        .unwrap();
        let answers = Answers::new()
            .with(FieldKey::Email, "garbage")
            .with(FieldKey::Phone, "not a phone")
            .with(FieldKey::City, "London");

        let Json(resp) = handle_merge(Json(MergeRequest { resume, answers }))
            .await
            .unwrap();

        assert_eq!(resp.resume.email(), Some("ada@x.com"));
        assert_eq!(resp.resume.phone(), Some("+15551234"));
        assert_eq!(resp.resume.city(), Some("London"));
    }
}
