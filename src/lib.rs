//! Financas is a backend for tracking personal finances.
//!
//! Users register and authenticate, then record transactions ("lançamentos"): incomes and
//! expenses with a month, year, amount and status. The library provides a JSON REST API over
//! services that validate transactions, filter them and compute the balance of a user.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
pub mod db;
pub mod endpoints;
mod logging;
pub mod models;
mod routes;
mod routing;
pub mod services;
pub mod stores;
#[cfg(test)]
mod test_utils;
pub mod validation;

pub use app_state::{AppConfig, AppState};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_REQUEST_BODY_BYTES, logging_middleware};
pub use routing::build_router;
pub use validation::ValidationError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A field of a candidate user or transaction is missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The email used to register a user is already in use. The client should try again with a
    /// different email address.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The user ID given for a transaction does not refer to a registered user.
    #[error("the user does not exist")]
    InvalidOwner,

    /// No user is registered with the email used to authenticate.
    ///
    /// Clients see the same response as for [Error::WrongPassword].
    #[error("no user is registered with the given email")]
    UserNotFound,

    /// The password used to authenticate does not match the stored hash.
    ///
    /// Clients see the same response as for [Error::UserNotFound].
    #[error("the password does not match")]
    WrongPassword,

    /// The request body, query string or path could not be parsed into the expected shape, e.g.,
    /// malformed JSON or a month that is not a number.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A sum of amounts, such as a balance, is too large to represent.
    #[error("the total amount is too large to calculate")]
    AmountOverflow,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidOwner
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::Validation(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::DuplicateEmail | Error::InvalidOwner | Error::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::AmountOverflow => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            // Do not tell the client which of the email or password was wrong.
            Error::UserNotFound | Error::WrongPassword => (
                StatusCode::UNAUTHORIZED,
                "invalid email or password".to_string(),
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred, check the server logs for more details"
                        .to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{Error, ValidationError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let connection = Connection::open_in_memory().unwrap();

        let error: Error = connection
            .query_row("SELECT 1 WHERE 1 = 0", [], |row| row.get::<_, i64>(0))
            .unwrap_err()
            .into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::from(ValidationError::InvalidAmount).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn authentication_errors_share_a_status() {
        let not_found = Error::UserNotFound.into_response();
        let wrong_password = Error::WrongPassword.into_response();

        assert_eq!(not_found.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn overflow_is_unprocessable() {
        let response = Error::AmountOverflow.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_errors_are_hidden() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
