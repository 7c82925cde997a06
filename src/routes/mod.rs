//! This module defines the REST API's route handlers.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};

use crate::Error;

mod transaction;
mod user;

pub(crate) use transaction::{
    create_transaction, delete_transaction, get_transaction, get_transactions,
    update_transaction, update_transaction_status,
};
pub(crate) use user::{authenticate_user, get_user, get_user_balance, register_user};

/// [axum::Json] that reports rejections as an [Error] with a JSON body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// [axum::extract::Query] that reports rejections as an [Error] with a JSON body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

/// [axum::extract::Path] that reports rejections as an [Error] with a JSON body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);
