use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A shared proposal resolvable by its public share token. A NULL
/// `password_hash` means the proposal has no password gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProposal {
    pub id: Uuid,
    pub share_token: String,
    pub is_public: bool,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SharedProposal {
    /// Whether the submitted password opens this proposal. Proposals without
    /// a stored hash accept anything.
    pub fn accepts_password(&self, submitted: &str) -> bool {
        match self.password_hash {
            Some(ref stored) => password_matches(submitted, stored),
            None => true,
        }
    }
}

/// Body of the verification endpoint. Both fields are required; they are
/// modeled as `Option` so the handler can report which one is missing.
#[derive(Debug, Deserialize)]
pub struct VerifyPasswordRequest {
    pub share_token: Option<String>,
    pub password: Option<String>,
}

impl VerifyPasswordRequest {
    /// Checks both required fields, treating empty strings the same as
    /// missing ones. Returns the exact caller-facing message on failure.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        let share_token = match self.share_token.as_deref() {
            Some(token) if !token.is_empty() => token,
            _ => return Err("Share token is required".to_string()),
        };

        let password = match self.password.as_deref() {
            Some(password) if !password.is_empty() => password,
            _ => return Err("Password is required".to_string()),
        };

        Ok((share_token, password))
    }
}

/// Lowercase hex SHA-256 digest of a password, the format stored in
/// `password_hash`.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Direct digest equality, as the source behavior does. Not constant-time;
/// see DESIGN.md for the hardening note.
pub fn password_matches(submitted: &str, stored_hash: &str) -> bool {
    password_digest(submitted) == stored_hash
}
