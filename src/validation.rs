//! Structural checks for candidate records.
//!
//! Validation happens before anything reaches a store, so a record that fails here never causes a
//! database round trip.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{NewTransaction, TransactionBuilder, TransactionStatus};

/// A field of a candidate record is missing or malformed.
///
/// All of these can be fixed by the client resubmitting corrected data.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The description is empty or only whitespace.
    #[error("a description is required")]
    MissingDescription,

    /// The month is missing or outside 1-12.
    #[error("the month must be between 1 and 12")]
    InvalidMonth,

    /// The year is missing or does not have exactly four digits.
    #[error("the year must have four digits")]
    InvalidYear,

    /// The transaction does not name a user.
    #[error("a user is required")]
    MissingOwner,

    /// The amount is missing, zero or negative.
    #[error("the amount must be greater than zero")]
    InvalidAmount,

    /// The type is missing or is not one of INCOME or EXPENSE.
    #[error("the type must be INCOME or EXPENSE")]
    MissingType,

    /// The status is not one of PENDING, CONFIRMED or CANCELED.
    #[error("the status must be PENDING, CONFIRMED or CANCELED")]
    InvalidStatus,

    /// The user's name is empty or only whitespace.
    #[error("a name is required")]
    InvalidName,

    /// The email address could not be parsed.
    #[error("the email address is not valid")]
    InvalidEmail,

    /// The password is empty or only whitespace.
    #[error("a password is required")]
    InvalidPassword,
}

/// Check the structural invariants of a candidate transaction.
///
/// The checks run in a fixed order and the first failure is returned: description, month, year,
/// owner, amount and then type. The candidate's status is ignored.
pub fn validate(candidate: &TransactionBuilder) -> Result<(), ValidationError> {
    to_new_transaction(candidate, TransactionStatus::Pending).map(|_| ())
}

/// Validate `candidate` and convert it into a [NewTransaction] with `status`.
pub(crate) fn to_new_transaction(
    candidate: &TransactionBuilder,
    status: TransactionStatus,
) -> Result<NewTransaction, ValidationError> {
    if candidate.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    let month = candidate
        .month
        .and_then(|month| u8::try_from(month).ok())
        .filter(|month| (1..=12).contains(month))
        .ok_or(ValidationError::InvalidMonth)?;

    let year = candidate
        .year
        .and_then(|year| u16::try_from(year).ok())
        .filter(|year| (1000..=9999).contains(year))
        .ok_or(ValidationError::InvalidYear)?;

    let user_id = candidate.user_id.ok_or(ValidationError::MissingOwner)?;

    let amount = candidate
        .amount
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or(ValidationError::InvalidAmount)?;

    let transaction_type = candidate
        .transaction_type
        .ok_or(ValidationError::MissingType)?;

    Ok(NewTransaction {
        description: candidate.description.clone(),
        month,
        year,
        amount,
        transaction_type,
        status,
        user_id,
    })
}

#[cfg(test)]
mod validate_tests {
    use rust_decimal::Decimal;

    use crate::models::{TransactionBuilder, TransactionStatus, TransactionType, UserID};

    use super::{ValidationError, validate};

    fn valid_candidate() -> TransactionBuilder {
        TransactionBuilder::new("Groceries", Decimal::new(4250, 2))
            .period(3, 2024)
            .transaction_type(TransactionType::Expense)
            .user_id(UserID::new(1))
    }

    #[test]
    fn accepts_valid_candidate() {
        assert_eq!(validate(&valid_candidate()), Ok(()));
    }

    #[test]
    fn ignores_status() {
        let candidate = valid_candidate().status(TransactionStatus::Canceled);

        assert_eq!(validate(&candidate), Ok(()));
    }

    #[test]
    fn rejects_blank_description() {
        for description in ["", "   ", "\t\n"] {
            let candidate = TransactionBuilder {
                description: description.to_string(),
                ..valid_candidate()
            };

            assert_eq!(
                validate(&candidate),
                Err(ValidationError::MissingDescription)
            );
        }
    }

    #[test]
    fn rejects_month_outside_range() {
        for month in [None, Some(0), Some(13), Some(-1), Some(300)] {
            let candidate = TransactionBuilder {
                month,
                ..valid_candidate()
            };

            assert_eq!(
                validate(&candidate),
                Err(ValidationError::InvalidMonth),
                "month {month:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_month_bounds() {
        for month in [1, 12] {
            let candidate = TransactionBuilder {
                month: Some(month),
                ..valid_candidate()
            };

            assert_eq!(validate(&candidate), Ok(()));
        }
    }

    #[test]
    fn rejects_year_without_four_digits() {
        for year in [None, Some(999), Some(10000), Some(24), Some(-2024)] {
            let candidate = TransactionBuilder {
                year,
                ..valid_candidate()
            };

            assert_eq!(
                validate(&candidate),
                Err(ValidationError::InvalidYear),
                "year {year:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_missing_owner() {
        let candidate = TransactionBuilder {
            user_id: None,
            ..valid_candidate()
        };

        assert_eq!(validate(&candidate), Err(ValidationError::MissingOwner));
    }

    #[test]
    fn rejects_non_positive_amount() {
        for amount in [None, Some(Decimal::ZERO), Some(Decimal::new(-1, 2))] {
            let candidate = TransactionBuilder {
                amount,
                ..valid_candidate()
            };

            assert_eq!(
                validate(&candidate),
                Err(ValidationError::InvalidAmount),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_missing_type() {
        let candidate = TransactionBuilder {
            transaction_type: None,
            ..valid_candidate()
        };

        assert_eq!(validate(&candidate), Err(ValidationError::MissingType));
    }

    #[test]
    fn reports_first_failing_field() {
        let candidate = TransactionBuilder {
            description: String::new(),
            month: Some(13),
            amount: None,
            ..Default::default()
        };

        assert_eq!(
            validate(&candidate),
            Err(ValidationError::MissingDescription)
        );
    }
}
