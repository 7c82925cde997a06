//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Implementers should return [Error::DuplicateEmail] if the email is already in use.
    fn create(&mut self, user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Whether a user with the given email exists.
    fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, Error>;
}
