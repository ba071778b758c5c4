//! Friends and profile management.

use tracing::info;

use parley_shared::constants::{MAX_BIO_CHARS, MAX_PROFILE_PHOTOS};
use parley_shared::{UserId, UserStatus};
use parley_store::User;

use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::state::Mode;

impl Session {
    /// Add a friend by their exact user id. Rejects self-adds and
    /// duplicates before any store lookup.
    pub async fn add_friend(&self, target: &UserId) -> Result<()> {
        let me = self.require_user()?;

        if *target == me.id {
            return Err(ClientError::Validation(
                "You cannot add yourself.".to_string(),
            ));
        }
        if me.friends.contains(target) {
            return Err(ClientError::Validation("Already friends.".to_string()));
        }

        let Some(target_user) = self.gateway.get_user_by_id(target).await? else {
            return Err(ClientError::NotFound("User ID not found.".to_string()));
        };

        let mut friends = me.friends.clone();
        friends.push(target.clone());
        self.gateway.update_user_friends(&me.id, &friends).await?;

        info!(user = %me.id, friend = %target, "added friend");

        let mut state = self.state();
        if let Some(current) = &mut state.current_user {
            current.friends = friends;
        }
        state.cache_user(target_user);
        Ok(())
    }

    /// Remove a friend from the current user's list.
    pub async fn remove_friend(&self, target: &UserId) -> Result<()> {
        let me = self.require_user()?;

        if !me.friends.contains(target) {
            return Err(ClientError::NotFound(
                "Not in your friend list.".to_string(),
            ));
        }

        let friends: Vec<UserId> = me
            .friends
            .iter()
            .filter(|f| *f != target)
            .cloned()
            .collect();
        self.gateway.update_user_friends(&me.id, &friends).await?;

        info!(user = %me.id, friend = %target, "removed friend");

        if let Some(current) = &mut self.state().current_user {
            current.friends = friends;
        }
        Ok(())
    }

    /// The current user's friend list resolved to full users, in list
    /// order. Stale ids are silently skipped.
    pub async fn friends(&self) -> Result<Vec<User>> {
        let me = self.require_user()?;
        self.gateway
            .get_users_by_ids(&me.friends)
            .await
            .map_err(Into::into)
    }

    /// Update the current user's bio, photo gallery, and self-reported
    /// status.
    pub async fn update_profile(
        &self,
        bio: &str,
        photos: &[String],
        status: UserStatus,
    ) -> Result<User> {
        let me = self.require_user()?;

        if bio.chars().count() > MAX_BIO_CHARS {
            return Err(ClientError::Validation(format!(
                "Bio must be at most {MAX_BIO_CHARS} characters."
            )));
        }
        if photos.len() > MAX_PROFILE_PHOTOS {
            return Err(ClientError::Validation(format!(
                "At most {MAX_PROFILE_PHOTOS} photos allowed."
            )));
        }

        self.gateway
            .update_user_profile(&me.id, bio, photos, status, me.is_online)
            .await?;

        let updated = User {
            bio: bio.to_string(),
            photos: photos.to_vec(),
            status,
            ..me
        };

        let mut state = self.state();
        state.current_user = Some(updated.clone());
        if state
            .viewed_profile
            .as_ref()
            .is_some_and(|viewed| viewed.id == updated.id)
        {
            state.viewed_profile = Some(updated.clone());
        }
        state.cache_user(updated.clone());
        Ok(updated)
    }

    /// Switch to the profile view for a user.
    pub async fn view_profile(&self, user_id: &UserId) -> Result<User> {
        let Some(user) = self.resolve_user_id(user_id).await? else {
            return Err(ClientError::NotFound("User not found.".to_string()));
        };

        let mut state = self.state();
        state.viewed_profile = Some(user.clone());
        state.mode = Mode::Profile;
        Ok(user)
    }
}
