use crate::core::errors::BalanceError;
use crate::core::models::{Expense, Participant};
use crate::infrastructure::storage::ExpenseStore;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    participants: Arc<RwLock<IndexMap<String, Participant>>>,
    expenses: Arc<RwLock<IndexMap<String, Expense>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            participants: Arc::new(RwLock::new(IndexMap::new())),
            expenses: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
}

#[async_trait]
impl ExpenseStore for InMemoryStorage {
    async fn save_participant(&self, participant: Participant) -> Result<(), BalanceError> {
        let mut participants = self.participants.write().await;
        participants.insert(participant.id.clone(), participant);
        Ok(())
    }

    async fn get_participant(&self, participant_id: &str) -> Result<Option<Participant>, BalanceError> {
        let participants = self.participants.read().await;
        Ok(participants.get(participant_id).cloned())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, BalanceError> {
        let participants = self.participants.read().await;
        Ok(participants.values().cloned().collect())
    }

    async fn delete_participant(&self, participant_id: &str) -> Result<Option<Participant>, BalanceError> {
        let mut participants = self.participants.write().await;
        Ok(participants.shift_remove(participant_id))
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), BalanceError> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>, BalanceError> {
        let mut expenses = self.expenses.write().await;
        Ok(expenses.shift_remove(expense_id))
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, BalanceError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.values().cloned().collect())
    }
}
