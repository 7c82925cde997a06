//! Implements a SQLite backed transaction store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Type, Value},
};
use rust_decimal::Decimal;

use crate::{
    Error,
    db::{CreateTable, LOWER_FUNCTION, MapRow},
    models::{
        NewTransaction, Transaction, TransactionID, TransactionStatus, TransactionType, UserID,
    },
    stores::{TransactionFilter, TransactionStore},
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::models::User) model, the user
/// table must be set up in the database and foreign keys should be enabled, see
/// [initialize](crate::db::initialize).
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, description, month, year, amount, transaction_type, status, user_id FROM \"transaction\"";

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidOwner] if `user_id` does not refer to a valid user,
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (description, month, year, amount, transaction_type, status, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, description, month, year, amount, transaction_type, status, user_id",
            )?
            .query_row(
                (
                    transaction.description,
                    transaction.month,
                    transaction.year,
                    transaction.amount.to_string(),
                    transaction.transaction_type,
                    transaction.status,
                    transaction.user_id.as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Overwrite every column of the stored transaction with the ID of `transaction`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no transaction with the same ID,
    /// - [Error::InvalidOwner] if `user_id` does not refer to a valid user,
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "UPDATE \"transaction\"
                 SET description = ?1, month = ?2, year = ?3, amount = ?4,
                     transaction_type = ?5, status = ?6, user_id = ?7
                 WHERE id = ?8
                 RETURNING id, description, month, year, amount, transaction_type, status, user_id",
            )?
            .query_row(
                (
                    transaction.description(),
                    transaction.month(),
                    transaction.year(),
                    transaction.amount().to_string(),
                    transaction.transaction_type(),
                    transaction.status(),
                    transaction.user_id().as_i64(),
                    transaction.id(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no transaction with `id`,
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: TransactionID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id",
                &[(":id", &id)],
            )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// Transactions are returned in order of year, month and then ID.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(filter.user_id.as_i64())];

        if let Some(description) = filter.description {
            where_clause_parts.push(format!(
                "{LOWER_FUNCTION}(description) LIKE {LOWER_FUNCTION}(?{}) ESCAPE '\\'",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(format!(
                "%{}%",
                escape_like_pattern(&description)
            )));
        }

        if let Some(month) = filter.month {
            where_clause_parts.push(format!("month = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(month.into()));
        }

        if let Some(year) = filter.year {
            where_clause_parts.push(format!("year = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(year.into()));
        }

        if let Some(transaction_type) = filter.transaction_type {
            where_clause_parts.push(format!(
                "transaction_type = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(transaction_type.as_str().to_string()));
        }

        let query_string = format!(
            "{SELECT_COLUMNS} WHERE {} ORDER BY year ASC, month ASC, id ASC",
            where_clause_parts.join(" AND ")
        );
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Sum the amounts of the matching transactions.
    ///
    /// Amounts are stored as text, so the sum is calculated with [Decimal] instead of SQLite's
    /// floating point `SUM`.
    ///
    /// # Errors
    /// This function will return an [Error::AmountOverflow] if the sum does not fit in a [Decimal],
    /// or an [Error::SqlError] if there is a SQL error or a stored amount is not a valid decimal.
    fn total(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        statuses: &[TransactionStatus],
    ) -> Result<Decimal, Error> {
        if statuses.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let status_placeholders = (0..statuses.len())
            .map(|i| format!("?{}", i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let query_string = format!(
            "SELECT amount FROM \"transaction\"
             WHERE user_id = ?1 AND transaction_type = ?2 AND status IN ({status_placeholders})"
        );

        let mut query_parameters = vec![
            Value::Integer(user_id.as_i64()),
            Value::Text(transaction_type.as_str().to_string()),
        ];
        query_parameters.extend(
            statuses
                .iter()
                .map(|status| Value::Text(status.as_str().to_string())),
        );

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                parse_amount(row, 0)
            })?
            .try_fold(Decimal::ZERO, |total, maybe_amount| {
                let amount = maybe_amount.map_err(Error::SqlError)?;

                total.checked_add(amount).ok_or(Error::AmountOverflow)
            })
    }
}

/// Escape the LIKE wildcards in `text` so that they match literally, using `\` as the escape
/// character.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

fn parse_amount(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw_amount: String = row.get(index)?;

    Decimal::from_str(&raw_amount)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection
                .execute(
                    "CREATE TABLE IF NOT EXISTS \"transaction\" (
                            id INTEGER PRIMARY KEY AUTOINCREMENT,
                            description TEXT NOT NULL,
                            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                            year INTEGER NOT NULL,
                            amount TEXT NOT NULL,
                            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('INCOME', 'EXPENSE')),
                            status TEXT NOT NULL CHECK (status IN ('PENDING', 'CONFIRMED', 'CANCELED')),
                            user_id INTEGER NOT NULL,
                            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                            )",
                    (),
                )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS transaction_user_id ON \"transaction\"(user_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let description = row.get(offset + 1)?;
        let month = row.get(offset + 2)?;
        let year = row.get(offset + 3)?;
        let amount = parse_amount(row, offset + 4)?;
        let transaction_type = row.get(offset + 5)?;
        let status = row.get(offset + 6)?;
        let user_id = UserID::new(row.get(offset + 7)?);

        Ok(Transaction::new_unchecked(
            id,
            description,
            month,
            year,
            amount,
            transaction_type,
            status,
            user_id,
        ))
    }
}
