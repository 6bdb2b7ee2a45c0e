use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a chat session. Always a v4 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_v4() {
        let sid = SessionId::new();
        assert_eq!(sid.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn session_id_display_round_trips_through_from_str() {
        let sid = SessionId::new();
        let parsed: SessionId = sid.to_string().parse().unwrap();
        assert_eq!(sid, parsed);
    }

    #[test]
    fn session_id_rejects_garbage() {
        assert!("not-a-session".parse::<SessionId>().is_err());
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::new();
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, format!("\"{sid}\""));
    }

    #[test]
    fn session_id_is_unique() {
        use std::collections::HashSet;
        let ids: HashSet<SessionId> = (0..100).map(|_| SessionId::new()).collect();
        assert_eq!(ids.len(), 100);
    }
}
