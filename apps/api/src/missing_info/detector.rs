use crate::missing_info::models::{FieldKey, InputKind, MissingField};
use crate::models::resume::{is_blank, ResumeRecord};

/// Lists the fields the collection form must ask for, in form order.
///
/// Rules are evaluated independently and in a fixed order, so the output is
/// stable for a given resume and can drive form layout directly. A rule that
/// is already satisfied contributes nothing.
pub fn detect_missing_info(resume: &ResumeRecord) -> Vec<MissingField> {
    let mut missing = Vec::new();

    if is_blank(resume.first_name()) {
        missing.push(MissingField::new(
            FieldKey::FirstName,
            InputKind::Text,
            true,
            "Enter your first name",
        ));
    }

    if is_blank(resume.last_name()) {
        missing.push(MissingField::new(
            FieldKey::LastName,
            InputKind::Text,
            true,
            "Enter your last name",
        ));
    }

    if is_blank(resume.email()) {
        missing.push(MissingField::new(
            FieldKey::Email,
            InputKind::Email,
            true,
            "Enter your email address",
        ));
    }

    if is_blank(resume.phone()) {
        missing.push(MissingField::new(
            FieldKey::Phone,
            InputKind::Phone,
            false,
            "Enter your phone number (optional)",
        ));
    }

    if is_blank(resume.city()) {
        missing.push(MissingField::new(
            FieldKey::City,
            InputKind::Text,
            false,
            "Enter your city (optional)",
        ));
    }

    if is_blank(resume.country()) {
        missing.push(MissingField::new(
            FieldKey::Country,
            InputKind::Text,
            false,
            "Enter your country (optional)",
        ));
    }

    match resume.experiences.as_deref() {
        Some([first, ..]) => {
            if is_blank(first.company.as_deref()) {
                missing.push(MissingField::new(
                    FieldKey::Company,
                    InputKind::Text,
                    false,
                    "Enter your current or most recent company",
                ));
            }
        }
        _ => missing.push(MissingField::new(
            FieldKey::Experience,
            InputKind::Multiline,
            false,
            "Describe your work experience (optional)",
        )),
    }

    if !resume.has_education() {
        missing.push(MissingField::new(
            FieldKey::Education,
            InputKind::Multiline,
            false,
            "Describe your education background (optional)",
        ));
    }

    missing
}

/// True when no required field is outstanding.
pub fn is_complete(missing: &[MissingField]) -> bool {
    !missing.iter().any(|f| f.required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, Location, PersonalData};

    fn keys(fields: &[MissingField]) -> Vec<FieldKey> {
        fields.iter().map(|f| f.field).collect()
    }

    fn full_resume() -> ResumeRecord {
        ResumeRecord {
            personal_data: Some(PersonalData {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                email: Some("ada@x.com".into()),
                phone: Some("+44 20 7946 0000".into()),
                location: Some(Location {
                    city: Some("London".into()),
                    country: Some("UK".into()),
                }),
                ..Default::default()
            }),
            experiences: Some(vec![ExperienceEntry {
                company: Some("Analytical Engines Ltd".into()),
                ..Default::default()
            }]),
            education: Some(vec![EducationEntry::default()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_resume_lists_everything_in_order() {
        let missing = detect_missing_info(&ResumeRecord::default());
        assert_eq!(
            keys(&missing),
            vec![
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Email,
                FieldKey::Phone,
                FieldKey::City,
                FieldKey::Country,
                FieldKey::Experience,
                FieldKey::Education,
            ]
        );
        let required: Vec<_> = missing
            .iter()
            .filter(|f| f.required)
            .map(|f| f.field)
            .collect();
        assert_eq!(
            required,
            vec![FieldKey::FirstName, FieldKey::LastName, FieldKey::Email]
        );
    }

    #[test]
    fn test_input_kinds() {
        let missing = detect_missing_info(&ResumeRecord::default());
        let kind = |key: FieldKey| missing.iter().find(|f| f.field == key).unwrap().input_kind;
        assert_eq!(kind(FieldKey::FirstName), InputKind::Text);
        assert_eq!(kind(FieldKey::Email), InputKind::Email);
        assert_eq!(kind(FieldKey::Phone), InputKind::Phone);
        assert_eq!(kind(FieldKey::Experience), InputKind::Multiline);
        assert_eq!(kind(FieldKey::Education), InputKind::Multiline);
    }

    #[test]
    fn test_complete_resume_has_nothing_missing() {
        let missing = detect_missing_info(&full_resume());
        assert!(missing.is_empty());
        assert!(is_complete(&missing));
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let mut resume = full_resume();
        let pd = resume.personal_data.as_mut().unwrap();
        pd.email = Some(String::new());
        pd.location.as_mut().unwrap().country = Some(String::new());

        let missing = detect_missing_info(&resume);
        assert_eq!(keys(&missing), vec![FieldKey::Email, FieldKey::Country]);
        assert!(!is_complete(&missing));
    }

    #[test]
    fn test_first_experience_without_company_asks_for_company() {
        let mut resume = full_resume();
        resume.experiences = Some(vec![
            ExperienceEntry {
                job_title: Some("Engineer".into()),
                ..Default::default()
            },
            ExperienceEntry {
                company: Some("Later Co".into()),
                ..Default::default()
            },
        ]);
        assert_eq!(keys(&detect_missing_info(&resume)), vec![FieldKey::Company]);
    }

    #[test]
    fn test_only_first_experience_is_checked_for_company() {
        let mut resume = full_resume();
        resume
            .experiences
            .as_mut()
            .unwrap()
            .push(ExperienceEntry::default());
        assert!(detect_missing_info(&resume).is_empty());
    }

    #[test]
    fn test_empty_lists_count_as_missing() {
        let mut resume = full_resume();
        resume.experiences = Some(vec![]);
        resume.education = Some(vec![]);
        assert_eq!(
            keys(&detect_missing_info(&resume)),
            vec![FieldKey::Experience, FieldKey::Education]
        );
    }

    #[test]
    fn test_missing_location_reports_city_and_country() {
        let mut resume = full_resume();
        resume.personal_data.as_mut().unwrap().location = None;
        assert_eq!(
            keys(&detect_missing_info(&resume)),
            vec![FieldKey::City, FieldKey::Country]
        );
    }

    #[test]
    fn test_audit_is_deterministic_and_pure() {
        let resume = ResumeRecord {
            experiences: Some(vec![ExperienceEntry::default()]),
            ..Default::default()
        };
        let before = resume.clone();
        let first = detect_missing_info(&resume);
        let second = detect_missing_info(&resume);
        assert_eq!(first, second);
        assert_eq!(resume, before);
    }

    #[test]
    fn test_keys_are_unique() {
        let missing = detect_missing_info(&ResumeRecord::default());
        let mut seen = keys(&missing);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), missing.len());
    }
}
