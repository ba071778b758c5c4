//! Account flows: register, login, logout.

use std::sync::Arc;

use tracing::{info, warn};

use parley_shared::{credentials, UserStatus};
use parley_store::User;

use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::state::SessionState;

impl Session {
    /// Register a new account and enter the lobby.
    pub async fn register(self: &Arc<Self>, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Username and password are required.".to_string(),
            ));
        }

        if self.gateway.get_user_by_username(username).await?.is_some() {
            return Err(ClientError::Validation("Username taken".to_string()));
        }

        let user = self.gateway.create_user(username, password).await?;
        info!(user = %user.id, username, "registered new account");

        self.state().current_user = Some(user.clone());
        self.enter_lobby();
        Ok(user)
    }

    /// Verify credentials, force the account online, and enter the lobby.
    pub async fn login(self: &Arc<Self>, username: &str, password: &str) -> Result<User> {
        let Some(stored) = self.gateway.get_user_by_username(username).await? else {
            return Err(ClientError::NotFound(
                "User not found. Please register.".to_string(),
            ));
        };

        if !credentials::verify_password(&stored.password_salt, &stored.password_hash, password) {
            return Err(ClientError::Validation("Invalid password".to_string()));
        }

        let user = User {
            status: UserStatus::Online,
            is_online: true,
            ..stored
        };
        self.gateway
            .update_user_profile(&user.id, &user.bio, &user.photos, UserStatus::Online, true)
            .await?;

        info!(user = %user.id, username, "logged in");

        self.state().current_user = Some(user.clone());
        self.enter_lobby();
        Ok(user)
    }

    /// Sign out: best-effort offline persist, stop all polling, reset the
    /// session to a blank authentication state.
    pub async fn logout(&self) {
        let me = self.state().current_user.clone();
        if let Some(me) = me {
            let result = self
                .gateway
                .update_user_profile(&me.id, &me.bio, &me.photos, UserStatus::Offline, false)
                .await;
            if let Err(e) = result {
                warn!(error = %e, "failed to persist offline status on logout");
            }
            info!(user = %me.id, "logged out");
        }

        self.stop_lobby_poll();
        self.stop_active_poll();
        *self.state() = SessionState::new();
    }
}
