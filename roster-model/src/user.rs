//! User records and the validated fetch boundary.

use crate::error::ModelError;
use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use url::Url;

/// A user record as held by the client.
///
/// Identity is `id`; the projected view guarantees at most one entry per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// `"first_name last_name"` as shown in list rows.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match against the full name or the email.
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

/// Create/update payload sent to the remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: String,
}

impl NewUser {
    /// Minimal payload validation before anything is sent to the server.
    pub fn validate(&self) -> Result<(), ModelError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ModelError::InvalidRecord("email is required".to_string()));
        }
        if !looks_like_email(email) {
            return Err(ModelError::InvalidRecord(format!(
                "not a valid email address: {email}"
            )));
        }
        if self.first_name.trim().is_empty() {
            return Err(ModelError::InvalidRecord(
                "first name is required".to_string(),
            ));
        }
        if self.last_name.trim().is_empty() {
            return Err(ModelError::InvalidRecord(
                "last name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize the payload into a record under the given id.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            avatar: sanitize_avatar(&self.avatar),
        }
    }
}

/// A user record as the server actually sends it: every field optional,
/// nothing trusted. [`RawUser::into_user`] is the only path into [`User`]
/// from the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl RawUser {
    /// Validate a wire record. Records without a usable id or email are
    /// rejected; text fields are trimmed; an avatar that is not a parseable
    /// URL is cleared rather than carried through.
    pub fn into_user(self) -> Result<User, ModelError> {
        let id = match self.id {
            Some(UserId::Num(num)) => UserId::Num(num),
            Some(UserId::Text(text)) => UserId::parse_text(&text)?,
            None => return Err(ModelError::InvalidRecord("missing id".to_string())),
        };

        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| ModelError::InvalidRecord(format!("user {id} has no email")))?
            .to_string();

        Ok(User {
            id,
            email,
            first_name: trimmed_or_empty(self.first_name),
            last_name: trimmed_or_empty(self.last_name),
            avatar: sanitize_avatar(self.avatar.as_deref().unwrap_or_default()),
        })
    }
}

fn trimmed_or_empty(field: Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn sanitize_avatar(avatar: &str) -> String {
    let avatar = avatar.trim();
    if avatar.is_empty() {
        return String::new();
    }
    match Url::parse(avatar) {
        Ok(_) => avatar.to_string(),
        Err(_) => String::new(),
    }
}

fn looks_like_email(candidate: &str) -> bool {
    match candidate.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}
