/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{
    Connection, Row, Transaction as SqlTransaction,
    functions::{Context, FunctionFlags},
};

use crate::{
    Error,
    stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore},
};

/// A trait for adding an object schema to a database.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
///
/// use financas_rs::db::CreateTable;
///
/// struct Foo;
///
/// impl CreateTable for Foo {
///    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
///        connection.execute(
///            "CREATE TABLE foo (id INTEGER PRIMARY KEY, desc TEXT NOT NULL)",
///            (),
///        )?;
///
///        Ok(())
///    }
/// }
///
/// let connection = Connection::open_in_memory().unwrap();
/// assert!(Foo::create_table(&connection).is_ok());
/// ```
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type a row is converted into.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// The name of the SQL function that lowercases text with Unicode case folding.
///
/// SQLite's `lower` and `LIKE` only fold ASCII letters, so 'Á' would not match 'á'.
pub const LOWER_FUNCTION: &str = "unicode_lower";

/// Create the tables for the domain models, turn on foreign key enforcement and register the
/// [LOWER_FUNCTION] SQL function.
///
/// SQL functions only live as long as the connection, so this must be called on every new
/// connection, not just when the database file is created.
///
/// The tables are created in a single exclusive transaction, so either every table is created or
/// none are. Calling this on a database that has already been initialized is a no-op.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;
    register_functions(connection)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        LOWER_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context: &Context<'_>| Ok(context.get::<String>(0)?.to_lowercase()),
    )
}
