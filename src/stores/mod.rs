//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod transaction;
mod user;

pub mod sqlite;

pub use transaction::{TransactionFilter, TransactionStore};
pub use user::UserStore;
