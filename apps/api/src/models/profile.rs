use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Contact details of the candidate plus the recovered resume text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub raw_text: String,
}

/// Profile fields as submitted by the candidate after reviewing the extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Email address is not valid: {0}")]
    InvalidEmail(String),
}

impl ProfileForm {
    /// Validates the form and turns it into a profile carrying `raw_text`.
    /// Nothing is mutated on failure.
    pub fn into_profile(self, raw_text: String) -> Result<CandidateProfile, ProfileError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        let phone = required("phone", &self.phone)?;

        if !EMAIL_SHAPE.is_match(&email) {
            return Err(ProfileError::InvalidEmail(email));
        }

        Ok(CandidateProfile {
            name,
            email,
            phone,
            raw_text,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: &str) -> ProfileForm {
        ProfileForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let profile = form("  Jane Doe ", "jane@site.org ", " (555) 123-4567")
            .into_profile("resume".to_string())
            .unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.email, "jane@site.org");
        assert_eq!(profile.phone, "(555) 123-4567");
        assert_eq!(profile.raw_text, "resume");
    }

    #[test]
    fn test_blank_field_is_reported_by_name() {
        let err = form("Jane Doe", "jane@site.org", "   ")
            .into_profile(String::new())
            .unwrap_err();
        assert_eq!(err, ProfileError::MissingField("phone"));

        let err = form("", "jane@site.org", "555")
            .into_profile(String::new())
            .unwrap_err();
        assert_eq!(err, ProfileError::MissingField("name"));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let err = form("Jane Doe", "jane.site.org", "5551234567")
            .into_profile(String::new())
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidEmail(_)));
    }
}
