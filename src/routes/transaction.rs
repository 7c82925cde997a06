//! The route handlers for creating, searching, editing and deleting transactions.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    Error, ValidationError,
    models::{Transaction, TransactionBuilder, TransactionID, TransactionType, UserID},
    routes::{Json, Path, Query},
    services::{TransactionService, UserService},
    stores::{TransactionFilter, TransactionStore, UserStore},
};

/// The JSON body for creating or replacing a transaction.
///
/// Every field is optional so that missing values are reported as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionData {
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// The month, within 1-12.
    pub month: Option<i32>,
    /// The four digit year.
    pub year: Option<i32>,
    /// The amount as a JSON string or number.
    pub amount: Option<Decimal>,
    /// "INCOME" or "EXPENSE".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The requested status. New transactions always start as pending, so this is ignored.
    pub status: Option<String>,
    /// The ID of the user that owns the transaction.
    pub user_id: Option<i64>,
}

impl From<TransactionData> for TransactionBuilder {
    fn from(data: TransactionData) -> Self {
        // Unrecognized types and statuses are left unset, so validation reports them in order
        // with the other fields.
        TransactionBuilder {
            description: data.description.unwrap_or_default(),
            month: data.month,
            year: data.year,
            amount: data.amount,
            transaction_type: data.transaction_type.and_then(|raw| raw.parse().ok()),
            status: data.status.and_then(|raw| raw.parse().ok()),
            user_id: data.user_id.map(UserID::new),
        }
    }
}

/// The JSON body for changing the status of a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusData {
    /// "PENDING", "CONFIRMED" or "CANCELED".
    pub status: String,
}

/// The query parameters for searching transactions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionQuery {
    /// The owner of the transactions, required.
    pub user_id: Option<i64>,
    /// Text the description must contain, ignoring case.
    pub description: Option<String>,
    /// The month of the transactions.
    pub month: Option<u8>,
    /// The year of the transactions.
    pub year: Option<u16>,
    /// "INCOME" or "EXPENSE".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// A route handler for creating a new, pending transaction.
pub async fn create_transaction<T>(
    State(mut service): State<TransactionService<T>>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Send + Sync,
{
    let transaction = service.save(data.into())?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for searching the transactions of a user.
///
/// Responds with 400 if `user_id` is missing or does not refer to a registered user.
pub async fn get_transactions<T, U>(
    State(service): State<TransactionService<T>>,
    State(user_service): State<UserService<U>>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user_id = query
        .user_id
        .map(UserID::new)
        .ok_or(ValidationError::MissingOwner)?;

    if user_service.find_by_id(user_id)?.is_none() {
        return Err(Error::InvalidOwner);
    }

    let transaction_type = query
        .transaction_type
        .map(|raw| raw.parse::<TransactionType>())
        .transpose()?;

    let filter = TransactionFilter {
        description: query.description.filter(|text| !text.is_empty()),
        month: query.month,
        year: query.year,
        transaction_type,
        ..TransactionFilter::for_user(user_id)
    };

    service.find(filter).map(Json)
}

/// A route handler for getting a transaction by its ID.
///
/// Responds with 404 if the transaction does not exist.
pub async fn get_transaction<T>(
    State(service): State<TransactionService<T>>,
    Path(transaction_id): Path<TransactionID>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Send + Sync,
{
    service.find_by_id(transaction_id).map(Json)
}

/// A route handler for replacing the fields of a transaction, keeping its status.
pub async fn update_transaction<T>(
    State(mut service): State<TransactionService<T>>,
    Path(transaction_id): Path<TransactionID>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let existing = service.find_by_id(transaction_id)?;

    service.update(&existing, data.into()).map(Json)
}

/// A route handler for moving a transaction to another status.
pub async fn update_transaction_status<T>(
    State(mut service): State<TransactionService<T>>,
    Path(transaction_id): Path<TransactionID>,
    Json(data): Json<StatusData>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let existing = service.find_by_id(transaction_id)?;

    service.update_status(existing, &data.status).map(Json)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction<T>(
    State(mut service): State<TransactionService<T>>,
    Path(transaction_id): Path<TransactionID>,
) -> Result<StatusCode, Error>
where
    T: TransactionStore + Send + Sync,
{
    let existing = service.find_by_id(transaction_id)?;
    service.delete(&existing)?;

    Ok(StatusCode::NO_CONTENT)
}
