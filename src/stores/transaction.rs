//! Defines the transaction store trait.

use rust_decimal::Decimal;

use crate::{
    Error,
    models::{
        NewTransaction, Transaction, TransactionID, TransactionStatus, TransactionType, UserID,
    },
};

/// Handles the creation, retrieval, modification and removal of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store and return it with its assigned ID.
    fn create(&mut self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Overwrite the stored transaction that has the same ID as `transaction`.
    ///
    /// Implementers should return [Error::NotFound] if there is no such transaction.
    fn update(&mut self, transaction: &Transaction) -> Result<Transaction, Error>;

    /// Remove a transaction from the store.
    ///
    /// Implementers should return [Error::NotFound] if there is no such transaction.
    fn delete(&mut self, id: TransactionID) -> Result<(), Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Implementers should return [Error::NotFound] if there is no such transaction.
    fn get(&self, id: TransactionID) -> Result<Transaction, Error>;

    /// Retrieve the transactions that match `filter`.
    fn get_query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// The sum of the amounts of `user_id`'s transactions of `transaction_type` that have one of
    /// `statuses`.
    ///
    /// Returns zero if no transactions match.
    fn total(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        statuses: &[TransactionStatus],
    ) -> Result<Decimal, Error>;
}

/// Defines which transactions [TransactionStore::get_query] returns.
///
/// Only the owner is required, every other field narrows the results when set.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions owned by this user.
    pub user_id: UserID,
    /// Only include transactions whose description contains this text, ignoring case.
    pub description: Option<String>,
    /// Only include transactions in this month.
    pub month: Option<u8>,
    /// Only include transactions in this year.
    pub year: Option<u16>,
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// A filter that matches every transaction owned by `user_id`.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            description: None,
            month: None,
            year: None,
            transaction_type: None,
        }
    }
}
