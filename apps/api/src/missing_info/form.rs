use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::missing_info::models::{Answers, InputKind, MissingField};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[1-9]\d{0,15}$").expect("valid phone regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormValidationResult {
    pub passed: bool,
    /// Field key -> user-facing message. At most one message per field.
    pub errors: BTreeMap<String, String>,
}

/// Checks submitted answers against the fields the form rendered.
///
/// Per field, later checks override earlier ones:
/// - required and blank (after trimming) → "<Label> is required"
/// - email input, non-empty and not `local@domain.tld` → invalid email
/// - phone input, non-empty and not a plausible number once spaces,
///   dashes and parentheses are removed → invalid phone
pub fn validate_answers(fields: &[MissingField], answers: &Answers) -> FormValidationResult {
    let mut errors = BTreeMap::new();

    for field in fields {
        let key = field.field.as_str().to_string();
        let value = answers.get(field.field);

        if field.required && value.map_or(true, |v| v.trim().is_empty()) {
            errors.insert(key.clone(), format!("{} is required", field.label));
        }

        let Some(value) = value else {
            continue;
        };

        match field.input_kind {
            InputKind::Email if !is_valid_email(value) => {
                errors.insert(key, "Please enter a valid email address".to_string());
            }
            InputKind::Phone if !is_valid_phone(value) => {
                errors.insert(key, "Please enter a valid phone number".to_string());
            }
            _ => {}
        }
    }

    FormValidationResult {
        passed: errors.is_empty(),
        errors,
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE_REGEX.is_match(&digits)
}
