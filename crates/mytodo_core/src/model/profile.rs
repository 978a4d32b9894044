//! Local profile model.
//!
//! # Responsibility
//! - Define the profile record stored apart from the todo document.
//! - Validate name and email before persistence.
//!
//! # Invariants
//! - `name` must not be blank after trim.
//! - `email` is either empty or matches `local@domain.tld`.
//! - `joined` is a `YYYY-MM-DD` date when set.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const JOINED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Profile validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    BlankName,
    InvalidEmail(String),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "profile name must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for ProfileValidationError {}

/// User profile shown on the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
}

impl Profile {
    /// Checks the save-time rules.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::BlankName);
        }
        if !is_valid_email(&self.email) {
            return Err(ProfileValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Fills `joined` with `today` when it is missing or blank.
    pub fn with_joined_default(mut self, today: NaiveDate) -> Self {
        let missing = self
            .joined
            .as_deref()
            .map_or(true, |value| value.trim().is_empty());
        if missing {
            self.joined = Some(today.format(JOINED_DATE_FORMAT).to_string());
        }
        self
    }
}

/// Returns `true` for an empty email or one shaped like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    email.is_empty() || EMAIL_RE.is_match(email)
}

/// Today's calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, Profile, ProfileValidationError};
    use chrono::NaiveDate;

    #[test]
    fn email_rule_matches_simple_addresses_only() {
        assert!(is_valid_email(""));
        assert!(is_valid_email("ann@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann smith@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn validate_rejects_blank_name_before_email() {
        let profile = Profile {
            name: "   ".to_string(),
            email: "bad".to_string(),
            ..Profile::default()
        };
        assert_eq!(profile.validate(), Err(ProfileValidationError::BlankName));
    }

    #[test]
    fn joined_default_keeps_existing_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let fresh = Profile::default().with_joined_default(today);
        assert_eq!(fresh.joined.as_deref(), Some("2024-03-09"));

        let existing = Profile {
            joined: Some("2020-01-01".to_string()),
            ..Profile::default()
        }
        .with_joined_default(today);
        assert_eq!(existing.joined.as_deref(), Some("2020-01-01"));
    }
}
