//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized, so a `User` can be sent to clients as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    name: String,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from values that have already been stored.
    ///
    /// Used by [UserStore](crate::stores::UserStore) implementations, new users should be
    /// created through [UserService::register](crate::services::UserService::register).
    pub fn new(id: UserID, name: String, email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The data needed to insert a user into a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The email address the user logs in with.
    pub email: EmailAddress,
    /// The salted and hashed password.
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod user_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;

    use crate::models::{PasswordHash, User, UserID};

    #[test]
    fn serialized_user_omits_password_hash() {
        let user = User::new(
            UserID::new(1),
            "Ana".to_string(),
            EmailAddress::from_str("ana@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
        );

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["email"], "ana@example.com");
        assert!(json.get("password_hash").is_none());
    }
}
