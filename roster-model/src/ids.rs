use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user record.
///
/// The remote directory assigns numeric ids; records created locally before
/// the server has durably stored them carry opaque `local-` string ids so the
/// two sequences can never collide. The wire representation is untagged: a
/// JSON number or a JSON string, whichever the server sent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(u64),
    Text(String),
}

impl UserId {
    /// Generate a fresh client-side id for a record the server has not
    /// assigned one to.
    pub fn new_local() -> Self {
        UserId::Text(format!("local-{}", Uuid::new_v4().simple()))
    }

    /// Whether this id was generated client-side.
    pub fn is_local(&self) -> bool {
        matches!(self, UserId::Text(text) if text.starts_with("local-"))
    }

    /// Normalize the wire form: servers occasionally return numeric ids as
    /// JSON strings, which would otherwise split one identity in two.
    pub fn canonical(self) -> Self {
        match self {
            UserId::Text(text) => match text.parse::<u64>() {
                Ok(num) => UserId::Num(num),
                Err(_) => UserId::Text(text),
            },
            id => id,
        }
    }

    /// Validate a textual id; empty or whitespace-only ids are rejected.
    pub fn parse_text(text: &str) -> Result<Self, ModelError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidId("empty id".to_string()));
        }
        Ok(UserId::Text(trimmed.to_string()).canonical())
    }
}

impl From<u64> for UserId {
    fn from(num: u64) -> Self {
        UserId::Num(num)
    }
}

impl From<&str> for UserId {
    fn from(text: &str) -> Self {
        UserId::Text(text.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Num(num) => write!(f, "{num}"),
            UserId::Text(text) => write!(f, "{text}"),
        }
    }
}
