//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    AppState, Error, endpoints,
    logging::logging_middleware,
    routes::{
        authenticate_user, create_transaction, delete_transaction, get_transaction,
        get_transactions, get_user, get_user_balance, register_user, update_transaction,
        update_transaction_status,
    },
    stores::{TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
pub fn build_router<T, U>(state: AppState<T, U>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let user_routes = Router::new()
        .route(endpoints::USERS, post(register_user::<U>))
        .route(endpoints::AUTHENTICATE, post(authenticate_user::<U>))
        .route(endpoints::USER, get(get_user::<U>))
        .route(endpoints::USER_BALANCE, get(get_user_balance::<T, U>));

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction::<T>).get(get_transactions::<T, U>),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction::<T>)
                .put(update_transaction::<T>)
                .delete(delete_transaction::<T>),
        )
        .route(
            endpoints::TRANSACTION_STATUS,
            put(update_transaction_status::<T>),
        );

    user_routes
        .merge(transaction_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::{body::Bytes, http::StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{MAX_REQUEST_BODY_BYTES, build_router, endpoints, test_utils::get_app_state};

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server =
            TestServer::try_new(build_router(get_app_state())).expect("Could not create test server.");

        let response = server.get("/api/nothing/here").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server =
            TestServer::try_new(build_router(get_app_state())).expect("Could not create test server.");
        let body = "x".repeat(MAX_REQUEST_BODY_BYTES + 1);

        let response = server
            .post(endpoints::USERS)
            .bytes(Bytes::from(body))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.json::<Value>()["error"].is_string());
    }
}
