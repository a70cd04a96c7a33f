//! Feedback form deserialization and validation

use serde::Deserialize;

pub const FIELD_REQUIRED: &str = "This field is required";

/// Values accepted as "true" by [`smart_bool`], lowercase.
const TRUE_VALUES: [&str; 5] = ["1", "true", "on", "yes", "y"];

/// Loose boolean parsing for form fields: a recognized truthy string means
/// true, any other present value means false, absence stays absent.
pub fn smart_bool(value: Option<&str>) -> Option<bool> {
    value.map(|v| TRUE_VALUES.contains(&v.to_lowercase().as_str()))
}

/// Raw feedback submission, straight off the wire.
///
/// The `_type` field is the legacy client marker: old clients that cannot
/// follow the current protocol send it, and its mere presence reroutes the
/// request to the legacy-compatibility handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackForm {
    pub happy: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub email_ok: Option<String>,
    pub manufacturer: Option<String>,
    pub device: Option<String>,
    #[serde(rename = "_type")]
    pub legacy_type: Option<String>,
}

impl FeedbackForm {
    pub fn has_legacy_marker(&self) -> bool {
        self.legacy_type.is_some()
    }

    /// The happy/sad hint used to pick which desktop form to re-render on
    /// validation failure. Not part of validation itself.
    pub fn happy_hint(&self) -> bool {
        smart_bool(self.happy.as_deref()).unwrap_or(false)
    }

    /// Validate the submission.
    ///
    /// `happy` must be present (any value, loosely interpreted) and
    /// `description` must be non-empty. Everything else is optional; in
    /// particular `email_ok` without an email is fine and simply collects
    /// nothing.
    pub fn validate(&self) -> Result<ValidFeedback, FormErrors> {
        let mut errors = FormErrors::default();

        let happy = match smart_bool(self.happy.as_deref()) {
            Some(value) => value,
            None => {
                errors.happy = Some(FIELD_REQUIRED);
                false
            }
        };

        let description = match self.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                errors.description = Some(FIELD_REQUIRED);
                String::new()
            }
        };

        if errors.any() {
            return Err(errors);
        }

        Ok(ValidFeedback {
            happy,
            description,
            url: non_empty(self.url.as_deref()),
            email: non_empty(self.email.as_deref()),
            email_ok: smart_bool(self.email_ok.as_deref()).unwrap_or(false),
            manufacturer: non_empty(self.manufacturer.as_deref()),
            device: non_empty(self.device.as_deref()),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFeedback {
    pub happy: bool,
    pub description: String,
    pub url: Option<String>,
    pub email: Option<String>,
    pub email_ok: bool,
    pub manufacturer: Option<String>,
    pub device: Option<String>,
}

impl ValidFeedback {
    /// Whether a contact email row must be created. Requires both a
    /// non-empty email and the explicit opt-in; anything less silently
    /// discards the email.
    pub fn wants_email_contact(&self) -> bool {
        self.email_ok && self.email.is_some()
    }
}

/// Field-level validation errors, kept inspectable so the caller can
/// re-render the form with inline indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub happy: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FormErrors {
    pub fn any(&self) -> bool {
        self.happy.is_some() || self.description.is_some()
    }
}
