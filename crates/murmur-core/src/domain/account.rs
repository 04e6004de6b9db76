//! Account entity.

use super::Email;
use crate::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login identity. Its id is shared with the account's [`Profile`](super::Profile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    /// Argon2 PHC string; never exposed via the API.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an account together with its profile.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: String,
    pub fullname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let account = Account {
            id: AccountId::new(1),
            email: Email::new("a@b.io").unwrap(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@b.io");
    }
}
