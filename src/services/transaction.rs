//! Validation, mutation and balance calculation for transactions.

use rust_decimal::Decimal;

use crate::{
    Error,
    models::{
        Transaction, TransactionBuilder, TransactionID, TransactionStatus, TransactionType, UserID,
    },
    stores::{TransactionFilter, TransactionStore},
    validation::to_new_transaction,
};

/// Selects which transaction statuses count towards a user's balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BalancePolicy {
    /// Count pending and confirmed transactions.
    #[default]
    ExcludeCanceled,
    /// Count only confirmed transactions.
    ConfirmedOnly,
    /// Count every transaction regardless of status.
    IncludeAll,
}

impl BalancePolicy {
    /// The statuses that are counted under this policy.
    pub fn statuses(&self) -> &'static [TransactionStatus] {
        match self {
            BalancePolicy::ExcludeCanceled => {
                &[TransactionStatus::Pending, TransactionStatus::Confirmed]
            }
            BalancePolicy::ConfirmedOnly => &[TransactionStatus::Confirmed],
            BalancePolicy::IncludeAll => &TransactionStatus::ALL,
        }
    }
}

/// Validates and mutates transactions and computes balances.
#[derive(Debug, Clone)]
pub struct TransactionService<T>
where
    T: TransactionStore,
{
    store: T,
    balance_policy: BalancePolicy,
}

impl<T> TransactionService<T>
where
    T: TransactionStore,
{
    /// Create a service backed by `store` that computes balances with `balance_policy`.
    pub fn new(store: T, balance_policy: BalancePolicy) -> Self {
        Self {
            store,
            balance_policy,
        }
    }

    /// Validate `candidate` and save it as a new, pending transaction.
    ///
    /// Any status set on the candidate is ignored.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the candidate is invalid, or any error from the store.
    pub fn save(&mut self, candidate: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = to_new_transaction(&candidate, TransactionStatus::Pending)?;

        self.store.create(transaction)
    }

    /// Replace the fields of `existing` with those of `candidate`.
    ///
    /// The ID and status of `existing` are kept, the candidate's status is ignored.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the candidate is invalid, or any error from the store.
    pub fn update(
        &mut self,
        existing: &Transaction,
        candidate: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let fields = to_new_transaction(&candidate, existing.status())?;

        let transaction = Transaction::new_unchecked(
            existing.id(),
            fields.description,
            fields.month,
            fields.year,
            fields.amount,
            fields.transaction_type,
            fields.status,
            fields.user_id,
        );

        self.store.update(&transaction)
    }

    /// Move `existing` to the status named by `new_status`.
    ///
    /// Any status can be moved to any other status.
    ///
    /// # Errors
    /// Returns [ValidationError::InvalidStatus](crate::ValidationError::InvalidStatus) if
    /// `new_status` is not the name of a status, or any error from the store.
    pub fn update_status(
        &mut self,
        existing: Transaction,
        new_status: &str,
    ) -> Result<Transaction, Error> {
        let status = new_status.parse::<TransactionStatus>()?;

        self.store.update(&existing.with_status(status))
    }

    /// Remove `existing` from the store.
    pub fn delete(&mut self, existing: &Transaction) -> Result<(), Error> {
        self.store.delete(existing.id())
    }

    /// Get the transactions that match `filter`.
    pub fn find(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
        self.store.get_query(filter)
    }

    /// Get a transaction by its ID, or [Error::NotFound] if it does not exist.
    pub fn find_by_id(&self, id: TransactionID) -> Result<Transaction, Error> {
        self.store.get(id)
    }

    /// The total income minus the total expenses of `user_id`.
    ///
    /// Only transactions with a status selected by the service's [BalancePolicy] are counted.
    /// Users without transactions have a balance of zero.
    pub fn balance_for_owner(&self, user_id: UserID) -> Result<Decimal, Error> {
        let statuses = self.balance_policy.statuses();

        let income = self
            .store
            .total(user_id, TransactionType::Income, statuses)?;
        let expenses = self
            .store
            .total(user_id, TransactionType::Expense, statuses)?;

        income.checked_sub(expenses).ok_or(Error::AmountOverflow)
    }
}
