//! Implements a struct that holds the state of the REST server.

use std::marker::{Send, Sync};

use axum::extract::FromRef;

use crate::{
    models::PasswordHash,
    services::{BalancePolicy, TransactionService, UserService},
    stores::{TransactionStore, UserStore},
};

/// Settings that change how the services behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Which transaction statuses count towards a user's balance.
    pub balance_policy: BalancePolicy,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            balance_policy: BalancePolicy::default(),
            password_hash_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<T, U>
where
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: T,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
    /// The settings passed on to the services.
    pub config: AppConfig,
}

impl<T, U> AppState<T, U>
where
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(transaction_store: T, user_store: U, config: AppConfig) -> Self {
        Self {
            transaction_store,
            user_store,
            config,
        }
    }
}

impl<T, U> FromRef<AppState<T, U>> for TransactionService<T>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Send + Sync,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        TransactionService::new(state.transaction_store.clone(), state.config.balance_policy)
    }
}

impl<T, U> FromRef<AppState<T, U>> for UserService<U>
where
    T: TransactionStore + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        UserService::new(state.user_store.clone(), state.config.password_hash_cost)
    }
}

#[cfg(test)]
mod app_state_tests {
    use axum::extract::FromRef;

    use crate::{
        models::{PasswordHash, UserID},
        services::{BalancePolicy, TransactionService, UserService},
        stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore},
        test_utils::{get_app_state, insert_test_user},
    };

    use super::AppConfig;

    #[test]
    fn default_config() {
        let config = AppConfig::default();

        assert_eq!(config.balance_policy, BalancePolicy::ExcludeCanceled);
        assert_eq!(config.password_hash_cost, PasswordHash::DEFAULT_COST);
    }

    #[test]
    fn services_share_the_state_stores() {
        let mut state = get_app_state();
        let user = insert_test_user(&mut state, "shared@test.com");

        let user_service = UserService::<SQLiteUserStore>::from_ref(&state);
        let transaction_service = TransactionService::<SQLiteTransactionStore>::from_ref(&state);

        assert_eq!(user_service.find_by_id(user.id()), Ok(Some(user.clone())));
        assert_eq!(user_service.find_by_id(UserID::new(user.id().as_i64() + 1)), Ok(None));
        assert_eq!(
            transaction_service.balance_for_owner(user.id()),
            Ok(rust_decimal::Decimal::ZERO)
        );
    }
}
