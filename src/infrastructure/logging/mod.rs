pub mod in_memory;

use crate::core::errors::BalanceError;
use crate::core::models::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        participant_id: Option<&str>,
    ) -> Result<(), BalanceError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, BalanceError>;
}
