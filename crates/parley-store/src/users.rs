//! CRUD operations for [`User`] records.

use chrono::Utc;
use rand::Rng;
use rusqlite::params;

use parley_shared::credentials;
use parley_shared::{UserId, UserStatus};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

/// Attempts before giving up on finding a free six-digit account number.
const ID_MINT_ATTEMPTS: usize = 8;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Create a new account with a server-assigned six-digit id.
    ///
    /// The password is stored as a salted BLAKE3 hash, never in clear. The
    /// new user starts Online with empty friends, bio, and photos.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let (salt, hash) = credentials::hash_password(password);

        let user = User {
            id: self.mint_user_id()?,
            username: username.to_string(),
            password_salt: salt,
            password_hash: hash,
            friends: Vec::new(),
            status: UserStatus::Online,
            is_online: true,
            bio: String::new(),
            photos: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        };

        self.conn().execute(
            "INSERT INTO users (id, username, password_salt, password_hash,
                                friends, status, is_online, bio, photos, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user.id.as_str(),
                user.username,
                user.password_salt,
                user.password_hash,
                serde_json::to_string(&user.friends)?,
                user.status.as_str(),
                user.is_online,
                user.bio,
                serde_json::to_string(&user.photos)?,
                user.created_at,
            ],
        )?;

        Ok(user)
    }

    /// Pick a random six-digit id not already taken.
    fn mint_user_id(&self) -> Result<UserId> {
        let mut rng = rand::thread_rng();
        for _ in 0..ID_MINT_ATTEMPTS {
            let candidate = rng.gen_range(100_000..1_000_000).to_string();
            let taken: bool = self.conn().query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                params![candidate],
                |row| row.get(0),
            )?;
            if !taken {
                return Ok(UserId::new(candidate));
            }
        }
        Err(StoreError::IdSpaceExhausted)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single user by their unique username.
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, password_salt, password_hash, friends,
                        status, is_online, bio, photos, created_at
                 FROM users
                 WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch a single user by id.
    pub fn get_user_by_id(&self, id: &UserId) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, password_salt, password_hash, friends,
                        status, is_online, bio, photos, created_at
                 FROM users
                 WHERE id = ?1",
                params![id.as_str()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch several users at once. Ids with no matching row are skipped;
    /// the result preserves the order of `ids`.
    pub fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_user_by_id(id) {
                Ok(user) => users.push(user),
                Err(StoreError::NotFound) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(users)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace a user's friend list wholesale.
    pub fn update_user_friends(&self, id: &UserId, friends: &[UserId]) -> Result<()> {
        self.conn().execute(
            "UPDATE users SET friends = ?1 WHERE id = ?2",
            params![serde_json::to_string(friends)?, id.as_str()],
        )?;
        Ok(())
    }

    /// Update the mutable profile fields in one statement.
    pub fn update_user_profile(
        &self,
        id: &UserId,
        bio: &str,
        photos: &[String],
        status: UserStatus,
        is_online: bool,
    ) -> Result<()> {
        self.conn().execute(
            "UPDATE users SET bio = ?1, photos = ?2, status = ?3, is_online = ?4
             WHERE id = ?5",
            params![
                bio,
                serde_json::to_string(photos)?,
                status.as_str(),
                is_online,
                id.as_str(),
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let password_salt: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let friends_json: String = row.get(4)?;
    let status_str: String = row.get(5)?;
    let is_online: bool = row.get(6)?;
    let bio: String = row.get(7)?;
    let photos_json: String = row.get(8)?;
    let created_at: i64 = row.get(9)?;

    let friends: Vec<UserId> = serde_json::from_str(&friends_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let photos: Vec<String> = serde_json::from_str(&photos_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    // Unknown status strings fall back to Online, matching how the column
    // default behaves.
    let status = UserStatus::parse(&status_str).unwrap_or(UserStatus::Online);

    Ok(User {
        id: UserId::new(id),
        username,
        password_salt,
        password_hash,
        friends,
        status,
        is_online,
        bio,
        photos,
        created_at,
    })
}
