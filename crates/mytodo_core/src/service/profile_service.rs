//! Profile use-case service.
//!
//! # Responsibility
//! - Load the profile with display defaults applied.
//! - Validate and persist profile edits.
//!
//! # Invariants
//! - Invalid profiles are never written.
//! - Loading never writes; the default `joined` date is display-only until
//!   the next save.

use crate::model::profile::{today_utc, Profile, ProfileValidationError};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    /// Input failed save-time validation.
    Validation(ProfileValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Profile service facade over repository implementations.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the stored profile, or an empty one, with `joined` filled in.
    pub fn load_profile(&self) -> Result<Profile, ProfileServiceError> {
        let stored = self.repo.load_profile().map_err(|err| {
            error!(
                "event=profile_load module=service status=error error_code={} error={}",
                err.code(),
                err
            );
            err
        })?;
        Ok(stored.unwrap_or_default().with_joined_default(today_utc()))
    }

    /// Validates and stores `profile`, replacing the previous record.
    pub fn save_profile(&self, profile: &Profile) -> Result<(), ProfileServiceError> {
        profile.validate()?;
        if let Err(err) = self.repo.save_profile(profile) {
            error!(
                "event=profile_save module=service status=error error_code={} error={}",
                err.code(),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=profile_save module=service status=ok has_email={} has_bio={}",
            !profile.email.is_empty(),
            profile.bio.is_some()
        );
        Ok(())
    }
}
