pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::BalanceError;
use crate::core::models::ScopedBalances;
use async_trait::async_trait;

/// Memoises computed scopes. Entries are only valid for the expense snapshot
/// they were computed from, so every write must call `invalidate_all`.
///
/// `invalidate_all` also bumps a generation counter. Callers read
/// `generation` before taking their snapshot and pass it to `save_scope`,
/// which drops the entry if an invalidation happened in between.
#[async_trait]
pub trait BalanceCache: Send + Sync {
    async fn get_scope(&self, key: &str) -> Result<Option<ScopedBalances>, BalanceError>;
    async fn generation(&self) -> Result<u64, BalanceError>;
    /// Returns whether the entry was stored.
    async fn save_scope(
        &self,
        key: &str,
        scope: &ScopedBalances,
        ttl: std::time::Duration,
        generation: u64,
    ) -> Result<bool, BalanceError>;
    async fn invalidate_all(&self) -> Result<(), BalanceError>;
}
