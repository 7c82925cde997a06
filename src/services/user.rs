//! Registration, authentication and lookup of users.

use std::str::FromStr;

use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error, ValidationError,
    models::{NewUser, PasswordHash, User, UserID, ValidatedPassword},
    stores::UserStore,
};

/// The details a client submits to register a new user.
///
/// Missing fields deserialize as empty strings so they are reported as validation errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Registration {
    /// The user's display name.
    pub name: String,
    /// The email address to log in with.
    pub email: String,
    /// The plaintext password, hashed before it is stored.
    pub password: String,
}

/// Validates, registers and authenticates users.
#[derive(Debug, Clone)]
pub struct UserService<U>
where
    U: UserStore,
{
    store: U,
    password_hash_cost: u32,
}

impl<U> UserService<U>
where
    U: UserStore,
{
    /// Create a service backed by `store` that hashes passwords with `password_hash_cost` rounds.
    ///
    /// See [PasswordHash::DEFAULT_COST] for the recommended cost.
    pub fn new(store: U, password_hash_cost: u32) -> Self {
        Self {
            store,
            password_hash_cost,
        }
    }

    /// Validate `registration` and store it as a new user.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [ValidationError::InvalidName] if the name is blank,
    /// - [ValidationError::InvalidEmail] if the email cannot be parsed,
    /// - [ValidationError::InvalidPassword] if the password is blank,
    /// - [Error::DuplicateEmail] if the email is already registered,
    /// - [Error::HashingError] if the password could not be hashed,
    /// - or any other error from the store.
    pub fn register(&mut self, registration: Registration) -> Result<User, Error> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidName.into());
        }

        let email = EmailAddress::from_str(registration.email.trim())
            .map_err(|_| ValidationError::InvalidEmail)?;
        let password = ValidatedPassword::new(&registration.password)?;

        if self.store.exists_by_email(&email)? {
            return Err(Error::DuplicateEmail);
        }

        let password_hash = PasswordHash::new(password, self.password_hash_cost)?;

        self.store.create(NewUser {
            name: name.to_owned(),
            email,
            password_hash,
        })
    }

    /// Get the user registered with `email` if `password` matches their password hash.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::UserNotFound] if no user is registered with `email`,
    /// - [Error::WrongPassword] if the password does not match,
    /// - [Error::HashingError] if the stored hash could not be checked,
    /// - or any other error from the store.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        // An email that cannot be parsed cannot belong to a registered user.
        let email = EmailAddress::from_str(email.trim()).map_err(|_| Error::UserNotFound)?;

        let user = self.store.get_by_email(&email).map_err(|error| match error {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })?;

        match user.password_hash().verify(password) {
            Ok(true) => Ok(user),
            Ok(false) => Err(Error::WrongPassword),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Get a user by their ID, or `None` if there is no such user.
    pub fn find_by_id(&self, id: UserID) -> Result<Option<User>, Error> {
        match self.store.get(id) {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }
}
