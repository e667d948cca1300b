use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum BalanceError {
    /// Expense failed validation and was not applied to any balance
    #[error("Malformed expense {expense_id}: {reason}")]
    MalformedExpense { expense_id: String, reason: String },

    /// Conservation or settlement postcondition broken; always a defect upstream
    #[error("Balance invariant violated: {0}")]
    BalanceInvariantViolated(String),

    /// Expense or settlement references an id outside the known participant set
    #[error("Unknown participant {0}")]
    UnknownParticipant(String),

    /// Amounts too large for `Decimal` arithmetic
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Participant {0} not found")]
    ParticipantNotFound(String),
    #[error("Participant {0} already exists")]
    ParticipantAlreadyExists(String),
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl BalanceError {
    pub fn malformed(expense_id: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::MalformedExpense {
            expense_id: expense_id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        BalanceError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }
}
