//! This file defines the type `Transaction`, the core type of the application, and the enums
//! that classify a transaction.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{models::UserID, validation::ValidationError};

/// Alias for the integer type used for transaction IDs in the database.
pub type TransactionID = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name used for the type in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::MissingType),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifecycle tag of a transaction.
///
/// New transactions always start as [TransactionStatus::Pending]. After that a transaction may
/// move between any of the statuses, there is no enforced workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// The transaction has been recorded but not yet confirmed.
    Pending,
    /// The transaction has gone through.
    Confirmed,
    /// The transaction was called off.
    Canceled,
}

impl TransactionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Confirmed,
        TransactionStatus::Canceled,
    ];

    /// The name used for the status in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Confirmed => "CONFIRMED",
            TransactionStatus::Canceled => "CANCELED",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "CONFIRMED" => Ok(TransactionStatus::Confirmed),
            "CANCELED" => Ok(TransactionStatus::Canceled),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! impl_sql_text_enum {
    ($enum_type:ty) => {
        impl ToSql for $enum_type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $enum_type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error| FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

impl_sql_text_enum!(TransactionType);
impl_sql_text_enum!(TransactionStatus);

/// An expense or income ("lançamento") that belongs to a user.
///
/// Transactions are created through the
/// [TransactionService](crate::services::TransactionService), which validates a
/// [TransactionBuilder] before handing it to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionID,
    description: String,
    month: u8,
    year: u16,
    amount: Decimal,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    status: TransactionStatus,
    user_id: UserID,
}

impl Transaction {
    /// Create a transaction from values that have already been stored.
    ///
    /// No validation is done, this is intended for stores mapping database rows.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        id: TransactionID,
        description: String,
        month: u8,
        year: u16,
        amount: Decimal,
        transaction_type: TransactionType,
        status: TransactionStatus,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            description,
            month,
            year,
            amount,
            transaction_type,
            status,
            user_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> TransactionID {
        self.id
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The month (1-12) the transaction belongs to.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The four digit year the transaction belongs to.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The amount of money spent or earned, always positive.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Whether the transaction is an income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The lifecycle status of the transaction.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// Replace the status of the transaction.
    pub fn with_status(self, status: TransactionStatus) -> Self {
        Self { status, ..self }
    }
}

/// A validated transaction that is ready to be inserted into a
/// [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A non-blank description.
    pub description: String,
    /// The month, within 1-12.
    pub month: u8,
    /// The four digit year.
    pub year: u16,
    /// The amount, greater than zero.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
    /// The status to store the transaction with.
    pub status: TransactionStatus,
    /// The owner of the transaction.
    pub user_id: UserID,
}

/// A candidate transaction as submitted by a client.
///
/// Every field is optional so that missing values can be reported as
/// [ValidationError]s by [validate](crate::validation::validate) rather than
/// failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionBuilder {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The month, expected to be within 1-12.
    pub month: Option<i32>,
    /// The year, expected to have four digits.
    pub year: Option<i32>,
    /// The amount, expected to be positive.
    pub amount: Option<Decimal>,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: Option<TransactionType>,
    /// The status requested by the client. Stores and services decide the real status, so this is
    /// never validated.
    pub status: Option<TransactionStatus>,
    /// The owner of the transaction.
    pub user_id: Option<UserID>,
}

impl TransactionBuilder {
    /// Start a candidate with a description and amount.
    pub fn new(description: &str, amount: Decimal) -> Self {
        Self {
            description: description.to_owned(),
            amount: Some(amount),
            ..Default::default()
        }
    }

    /// Set the month and year of the transaction.
    pub fn period(mut self, month: i32, year: i32) -> Self {
        self.month = Some(month);
        self.year = Some(year);
        self
    }

    /// Set the type of the transaction.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Set the requested status of the transaction.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the owner of the transaction.
    pub fn user_id(mut self, user_id: UserID) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
