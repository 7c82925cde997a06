#![allow(missing_docs)]

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    AppConfig,
    models::{NewUser, PasswordHash, User},
    services::BalancePolicy,
    stores::{
        UserStore,
        sqlite::{SQLAppState, create_app_state},
    },
};

/// The lowest cost bcrypt accepts, so tests that hash passwords stay fast.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

pub(crate) fn get_test_config() -> AppConfig {
    AppConfig {
        balance_policy: BalancePolicy::default(),
        password_hash_cost: TEST_PASSWORD_COST,
    }
}

pub(crate) fn get_app_state() -> SQLAppState {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");

    create_app_state(connection, get_test_config()).expect("could not create app state")
}

#[track_caller]
pub(crate) fn insert_test_user(state: &mut SQLAppState, email: &str) -> User {
    state
        .user_store
        .create(NewUser {
            name: "Test User".to_owned(),
            email: EmailAddress::from_str(email).expect("invalid test email"),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        })
        .expect("could not create test user")
}
