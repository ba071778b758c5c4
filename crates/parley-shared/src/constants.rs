/// Application name
pub const APP_NAME: &str = "Parley";

/// Prefix character marking an in-band chat command
pub const COMMAND_PREFIX: char = '/';

/// Lobby room-list poll interval in milliseconds
pub const LOBBY_POLL_INTERVAL_MS: u64 = 4_000;

/// Active room/DM message poll interval in milliseconds
pub const ACTIVE_POLL_INTERVAL_MS: u64 = 2_000;

/// Maximum rooms returned by a room-list fetch
pub const ROOM_LIST_LIMIT: usize = 50;

/// Maximum messages returned by a conversation fetch
pub const MESSAGE_FETCH_LIMIT: usize = 100;

/// Maximum rooms a single user may administer
pub const MAX_ROOMS_PER_USER: usize = 5;

/// Maximum profile bio length in characters
pub const MAX_BIO_CHARS: usize = 150;

/// Maximum profile photos; index 0 is the avatar
pub const MAX_PROFILE_PHOTOS: usize = 6;

/// Marker prepended to direct-message content sent via /msg
pub const PM_MARKER: &str = "(PM) ";

/// Synthetic sender id for local notices and persisted system messages
pub const SYSTEM_SENDER_ID: &str = "SYSTEM";

/// Display name for the synthetic system sender
pub const SYSTEM_SENDER_NAME: &str = "System";

/// Synthetic sender id for AI completions
pub const AI_SENDER_ID: &str = "AI_BOT";

/// Display name for AI completions
pub const AI_SENDER_NAME: &str = "ParleyBot";

/// Key derivation context for credential hashing (BLAKE3)
pub const KDF_CONTEXT_PASSWORD: &str = "parley-password-v1";

/// Salt size in bytes for credential hashing
pub const PASSWORD_SALT_SIZE: usize = 16;
