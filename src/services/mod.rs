//! The business logic that sits between the API routes and the stores.
//!
//! Services receive their stores through their constructors, so the same logic runs against
//! SQLite in production and whatever store a test hands in.

mod transaction;
mod user;

pub use transaction::{BalancePolicy, TransactionService};
pub use user::{Registration, UserService};
