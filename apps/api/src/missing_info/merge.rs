use crate::missing_info::models::{Answers, FieldKey};
use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeRecord};

const DEFAULT_JOB_TITLE: &str = "Professional Experience";
const DEFAULT_COMPANY: &str = "Various Companies";
const DEFAULT_EXPERIENCE_START: &str = "2020-01-01";
const DEFAULT_EXPERIENCE_END: &str = "Present";

const DEFAULT_INSTITUTION: &str = "Educational Institution";
const DEFAULT_DEGREE: &str = "Degree";
const DEFAULT_EDUCATION_START: &str = "2018-01-01";
const DEFAULT_EDUCATION_END: &str = "2022-01-01";

/// Folds collected answers into a copy of `resume`.
///
/// Only non-empty answers are applied. `experience` and `education` insert a
/// synthetic entry, and only into an absent or empty list; when the list
/// already has entries the answer is dropped. `company` is only read while
/// inserting that experience entry.
pub fn merge_missing_info(resume: &ResumeRecord, answers: &Answers) -> ResumeRecord {
    let mut merged = resume.clone();

    for key in [
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Email,
        FieldKey::Phone,
    ] {
        if let Some(value) = answers.get(key) {
            let personal = merged.personal_data.get_or_insert_with(Default::default);
            let slot = match key {
                FieldKey::FirstName => &mut personal.first_name,
                FieldKey::LastName => &mut personal.last_name,
                FieldKey::Email => &mut personal.email,
                _ => &mut personal.phone,
            };
            *slot = Some(value.to_string());
        }
    }

    for key in [FieldKey::City, FieldKey::Country] {
        if let Some(value) = answers.get(key) {
            let location = merged
                .personal_data
                .get_or_insert_with(Default::default)
                .location
                .get_or_insert_with(Default::default);
            let slot = match key {
                FieldKey::City => &mut location.city,
                _ => &mut location.country,
            };
            *slot = Some(value.to_string());
        }
    }

    if let Some(text) = answers.get(FieldKey::Experience) {
        let experiences = merged.experiences.get_or_insert_with(Vec::new);
        if experiences.is_empty() {
            experiences.push(ExperienceEntry {
                job_title: Some(DEFAULT_JOB_TITLE.to_string()),
                company: Some(
                    answers
                        .get(FieldKey::Company)
                        .unwrap_or(DEFAULT_COMPANY)
                        .to_string(),
                ),
                description: Some(vec![text.to_string()]),
                start_date: Some(DEFAULT_EXPERIENCE_START.to_string()),
                end_date: Some(DEFAULT_EXPERIENCE_END.to_string()),
                ..Default::default()
            });
        }
    }

    if let Some(text) = answers.get(FieldKey::Education) {
        let education = merged.education.get_or_insert_with(Vec::new);
        if education.is_empty() {
            education.push(EducationEntry {
                institution: Some(DEFAULT_INSTITUTION.to_string()),
                degree: Some(DEFAULT_DEGREE.to_string()),
                description: Some(text.to_string()),
                start_date: Some(DEFAULT_EDUCATION_START.to_string()),
                end_date: Some(DEFAULT_EDUCATION_END.to_string()),
                ..Default::default()
            });
        }
    }

    merged
}
