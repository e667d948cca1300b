use crate::core::errors::BalanceError;
use crate::core::models::ScopedBalances;
use crate::infrastructure::cache::BalanceCache;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, (ScopedBalances, DateTime<Utc>)>,
    generation: u64,
}

#[derive(Clone, Default)]
pub struct InMemoryCache {
    state: Arc<RwLock<CacheState>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }
}

#[async_trait]
impl BalanceCache for InMemoryCache {
    async fn get_scope(&self, key: &str) -> Result<Option<ScopedBalances>, BalanceError> {
        let state = self.state.read().await;
        let now = Utc::now();
        Ok(state
            .entries
            .get(key)
            .filter(|(_, expiry)| *expiry > now)
            .map(|(scope, _)| scope.clone()))
    }

    async fn generation(&self) -> Result<u64, BalanceError> {
        Ok(self.state.read().await.generation)
    }

    async fn save_scope(
        &self,
        key: &str,
        scope: &ScopedBalances,
        ttl: std::time::Duration,
        generation: u64,
    ) -> Result<bool, BalanceError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| BalanceError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut state = self.state.write().await;
        if state.generation != generation {
            return Ok(false);
        }
        state
            .entries
            .insert(key.to_string(), (scope.clone(), Utc::now() + ttl));
        Ok(true)
    }

    async fn invalidate_all(&self) -> Result<(), BalanceError> {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.generation += 1;
        Ok(())
    }
}
