//! The route handlers for registering, authenticating and looking up users.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{User, UserID},
    routes::{Json, Path},
    services::{Registration, TransactionService, UserService},
    stores::{TransactionStore, UserStore},
};

/// The JSON body for authenticating a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// The email the user registered with.
    pub email: String,
    /// The user's plaintext password.
    pub password: String,
}

/// The JSON body returned for a user's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Total income minus total expenses.
    pub balance: Decimal,
}

/// A route handler for registering a new user.
pub async fn register_user<U>(
    State(mut service): State<UserService<U>>,
    Json(registration): Json<Registration>,
) -> Result<impl IntoResponse, Error>
where
    U: UserStore + Send + Sync,
{
    let user = service.register(registration)?;
    tracing::info!("Registered user {}", user.id());

    Ok((StatusCode::CREATED, Json(user)))
}

/// A route handler for checking a user's email and password.
///
/// Unknown emails and wrong passwords get the same 401 response.
pub async fn authenticate_user<U>(
    State(service): State<UserService<U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<User>, Error>
where
    U: UserStore + Send + Sync,
{
    service
        .authenticate(&credentials.email, &credentials.password)
        .map(Json)
}

/// A route handler for getting a user by their ID.
pub async fn get_user<U>(
    State(service): State<UserService<U>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, Error>
where
    U: UserStore + Send + Sync,
{
    service
        .find_by_id(UserID::new(user_id))?
        .map(Json)
        .ok_or(Error::NotFound)
}

/// A route handler for getting the balance of a user.
///
/// Responds with 404 if the user does not exist.
pub async fn get_user_balance<T, U>(
    State(transaction_service): State<TransactionService<T>>,
    State(user_service): State<UserService<U>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Balance>, Error>
where
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = user_service
        .find_by_id(UserID::new(user_id))?
        .ok_or(Error::NotFound)?;

    let balance = transaction_service.balance_for_owner(user.id())?;

    Ok(Json(Balance { balance }))
}

#[cfg(test)]
mod user_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use crate::{
        build_router,
        endpoints::{self, format_endpoint},
        models::Transaction,
        test_utils::get_app_state,
    };

    use super::Balance;

    fn get_server() -> TestServer {
        TestServer::try_new(build_router(get_app_state())).expect("Could not create test server.")
    }

    async fn register(server: &TestServer, email: &str, password: &str) -> Value {
        let response = server
            .post(endpoints::USERS)
            .json(&json!({"name": "Ana", "email": email, "password": password}))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<Value>()
    }

    #[tokio::test]
    async fn register_returns_user_without_password() {
        let server = get_server();

        let user = register(&server, "a@x.com", "right").await;

        assert!(user["id"].as_i64().is_some_and(|id| id > 0));
        assert_eq!(user["name"], "Ana");
        assert_eq!(user["email"], "a@x.com");
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_fails_on_duplicate_email() {
        let server = get_server();
        register(&server, "a@x.com", "right").await;

        server
            .post(endpoints::USERS)
            .json(&json!({"name": "Bia", "email": "a@x.com", "password": "other"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_on_missing_fields() {
        let server = get_server();

        for body in [
            json!({"email": "a@x.com", "password": "right"}),
            json!({"name": "Ana", "email": "nope", "password": "right"}),
            json!({"name": "Ana", "email": "a@x.com"}),
        ] {
            server
                .post(endpoints::USERS)
                .json(&body)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn authenticate_succeeds() {
        let server = get_server();
        let user = register(&server, "a@x.com", "right").await;

        let response = server
            .post(endpoints::AUTHENTICATE)
            .json(&json!({"email": "a@x.com", "password": "right"}))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), user);
    }

    #[tokio::test]
    async fn authentication_failures_look_the_same() {
        let server = get_server();
        register(&server, "a@x.com", "right").await;

        let wrong_password = server
            .post(endpoints::AUTHENTICATE)
            .json(&json!({"email": "a@x.com", "password": "wrong"}))
            .await;
        let unknown_email = server
            .post(endpoints::AUTHENTICATE)
            .json(&json!({"email": "b@x.com", "password": "right"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            wrong_password.json::<Value>(),
            unknown_email.json::<Value>()
        );
    }

    #[tokio::test]
    async fn get_user() {
        let server = get_server();
        let user = register(&server, "a@x.com", "right").await;
        let id = user["id"].as_i64().unwrap();

        let response = server.get(&format_endpoint(endpoints::USER, id)).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), user);

        server
            .get(&format_endpoint(endpoints::USER, id + 1))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn balance_is_income_minus_expenses() {
        let server = get_server();
        let user = register(&server, "a@x.com", "right").await;
        let id = user["id"].as_i64().unwrap();

        for (amount, transaction_type) in [
            ("100.00", "INCOME"),
            ("30.00", "EXPENSE"),
            ("50.00", "INCOME"),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&json!({
                    "description": "Lançamento",
                    "month": 1,
                    "year": 2024,
                    "amount": amount,
                    "type": transaction_type,
                    "user_id": id,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(&format_endpoint(endpoints::USER_BALANCE, id))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Balance>().balance,
            Decimal::new(12000, 2)
        );
    }

    #[tokio::test]
    async fn balance_excludes_canceled_transactions() {
        let server = get_server();
        let user = register(&server, "a@x.com", "right").await;
        let id = user["id"].as_i64().unwrap();

        let transaction = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "Salário",
                "month": 1,
                "year": 2024,
                "amount": "100.00",
                "type": "INCOME",
                "user_id": id,
            }))
            .await
            .json::<Transaction>();
        server
            .put(&format_endpoint(endpoints::TRANSACTION_STATUS, transaction.id()))
            .json(&json!({"status": "CANCELED"}))
            .await
            .assert_status_ok();

        let response = server
            .get(&format_endpoint(endpoints::USER_BALANCE, id))
            .await;

        assert_eq!(response.json::<Balance>().balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn balance_of_missing_user_is_not_found() {
        let server = get_server();

        server
            .get(&format_endpoint(endpoints::USER_BALANCE, 42))
            .await
            .assert_status_not_found();
    }
}
