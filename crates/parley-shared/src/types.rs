use serde::{Deserialize, Serialize};

// User identity = server-assigned six-digit account number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    // Room ids are minted client-side from the creation timestamp
    pub fn from_timestamp(millis: i64) -> Self {
        Self(format!("room-{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either a room id or a canonical two-party DM id.
///
/// DM ids are the two participant ids sorted lexicographically and joined
/// with `_`, so the same pair always maps to the same conversation no
/// matter who opens it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn room(id: &RoomId) -> Self {
        Self(id.0.clone())
    }

    pub fn direct(a: &UserId, b: &UserId) -> Self {
        let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self(format!("{}_{}", lo.0, hi.0))
    }

    // Room ids never contain '_'; DM ids always do
    pub fn is_direct(&self) -> bool {
        self.0.contains('_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Time-derived, not globally unique under concurrent senders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_timestamp(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    System,
    CommandResponse,
    Action,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::System => "SYSTEM",
            Self::CommandResponse => "CMD_RESPONSE",
            Self::Action => "ACTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TEXT" => Some(Self::Text),
            "SYSTEM" => Some(Self::System),
            "CMD_RESPONSE" => Some(Self::CommandResponse),
            "ACTION" => Some(Self::Action),
            _ => None,
        }
    }
}

/// Self-reported availability, independent of the liveness flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    Online,
    Busy,
    Away,
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Away => "Away",
            Self::Offline => "Offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Online" => Some(Self::Online),
            "Busy" => Some(Self::Busy),
            "Away" => Some(Self::Away),
            "Offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dm_id_symmetric() {
        let a = UserId::new("100001");
        let b = UserId::new("900009");

        assert_eq!(
            ConversationId::direct(&a, &b),
            ConversationId::direct(&b, &a)
        );
    }

    #[test]
    fn test_dm_id_sorted_pair() {
        let a = UserId::new("555555");
        let b = UserId::new("111111");

        let id = ConversationId::direct(&a, &b);
        assert_eq!(id.as_str(), "111111_555555");
    }

    #[test]
    fn test_distinct_pairs_distinct_ids() {
        let a = UserId::new("100001");
        let b = UserId::new("200002");
        let c = UserId::new("300003");

        assert_ne!(
            ConversationId::direct(&a, &b),
            ConversationId::direct(&a, &c)
        );
    }

    #[test]
    fn test_is_direct() {
        let room = ConversationId::room(&RoomId::from_timestamp(1_700_000_000_000));
        let dm = ConversationId::direct(&UserId::new("100001"), &UserId::new("200002"));

        assert!(!room.is_direct());
        assert!(dm.is_direct());
    }

    #[test]
    fn test_message_kind_strings() {
        for kind in [
            MessageKind::Text,
            MessageKind::System,
            MessageKind::CommandResponse,
            MessageKind::Action,
        ] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("VOICE"), None);
    }

    #[test]
    fn test_user_status_strings() {
        for status in [
            UserStatus::Online,
            UserStatus::Busy,
            UserStatus::Away,
            UserStatus::Offline,
        ] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("Invisible"), None);
    }
}
