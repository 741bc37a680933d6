use std::sync::Arc;

use quiz_core::model::{Profile, UserId};
use storage::auth::Identity;
use storage::repository::{NewProfileRecord, ProfileRepository};

use crate::error::ProfileServiceError;

/// Loads the profile row backing the current identity.
///
/// No caching: callers re-fetch whenever the identity changes, and the
/// catalog screen re-fetches on every mount.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// The profile for an identity, `None` when the row does not exist
    /// (e.g. sign-up finished but the insert failed).
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` for backend failures.
    pub async fn profile_for(
        &self,
        identity: &Identity,
    ) -> Result<Option<Profile>, ProfileServiceError> {
        Ok(self.profiles.get_profile(identity.user_id()).await?)
    }

    /// Write the initial profile row for a fresh account.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` for backend failures.
    pub async fn create_profile(
        &self,
        user_id: UserId,
        display_name: &str,
    ) -> Result<(), ProfileServiceError> {
        self.profiles
            .insert_profile(NewProfileRecord::initial(user_id, display_name))
            .await?;
        Ok(())
    }
}

/// Display name used for a fresh account: the local part of the sign-up
/// email, or the whole address if it has no `@`.
#[must_use]
pub fn display_name_from_email(email: &str) -> &str {
    email.split('@').next().filter(|s| !s.is_empty()).unwrap_or(email)
}
