use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable key for one value the collection form can ask for.
/// Every key the auditor emits is one the merge step knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FirstName,
    LastName,
    Email,
    Phone,
    City,
    Country,
    Experience,
    Company,
    Education,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::City => "city",
            FieldKey::Country => "country",
            FieldKey::Experience => "experience",
            FieldKey::Company => "company",
            FieldKey::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::FirstName => "First Name",
            FieldKey::LastName => "Last Name",
            FieldKey::Email => "Email Address",
            FieldKey::Phone => "Phone Number",
            FieldKey::City => "City",
            FieldKey::Country => "Country",
            FieldKey::Experience => "Work Experience",
            FieldKey::Company => "Company Name",
            FieldKey::Education => "Education",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    /// Rendered as a multi-row text area.
    #[serde(rename = "textarea", alias = "multiline")]
    Multiline,
    Email,
    Phone,
}

/// One outstanding input the collection form must render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingField {
    pub field: FieldKey,
    pub label: String,
    #[serde(rename = "type")]
    pub input_kind: InputKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl MissingField {
    pub fn new(field: FieldKey, input_kind: InputKind, required: bool, placeholder: &str) -> Self {
        Self {
            field,
            label: field.label().to_string(),
            input_kind,
            required,
            placeholder: Some(placeholder.to_string()),
        }
    }
}

/// User answers keyed by field key, as submitted by the collection form.
///
/// Values that are not JSON strings, and keys no auditor rule produces,
/// are tolerated and simply never applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, Value>);

impl Answers {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.0
            .insert(key.as_str().to_string(), Value::String(value.into()));
        self
    }

    /// The submitted string for `key`, empty or not.
    pub fn raw(&self, key: FieldKey) -> Option<&str> {
        self.0.get(key.as_str()).and_then(Value::as_str)
    }

    /// The submitted string for `key` when it is non-empty.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.raw(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Only the answers the form could have asked for, given `fields`: each
    /// listed field, plus `company` alongside a listed `experience`.
    pub fn for_fields(&self, fields: &[MissingField]) -> Self {
        let offered = |key: &str| {
            fields.iter().any(|f| {
                f.field.as_str() == key
                    || (key == FieldKey::Company.as_str() && f.field == FieldKey::Experience)
            })
        };
        Self(
            self.0
                .iter()
                .filter(|(key, _)| offered(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}
