//! This module defines the domain data types.

pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{
    NewTransaction, Transaction, TransactionBuilder, TransactionID, TransactionStatus,
    TransactionType,
};
pub use user::{NewUser, User, UserID};

mod password;
mod transaction;
mod user;
