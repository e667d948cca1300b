use crate::core::errors::BalanceError;
use crate::core::models::{Expense, Participant};
use async_trait::async_trait;

/// Source of the expense snapshot and participant directory. Listing methods
/// return records in insertion order, which fixes settlement matching order.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn save_participant(&self, participant: Participant) -> Result<(), BalanceError>;
    async fn get_participant(&self, participant_id: &str) -> Result<Option<Participant>, BalanceError>;
    async fn list_participants(&self) -> Result<Vec<Participant>, BalanceError>;
    async fn delete_participant(&self, participant_id: &str) -> Result<Option<Participant>, BalanceError>;
    async fn save_expense(&self, expense: Expense) -> Result<(), BalanceError>;
    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>, BalanceError>;
    async fn list_expenses(&self) -> Result<Vec<Expense>, BalanceError>;
}

pub mod in_memory;
