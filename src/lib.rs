pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::BalanceError;
pub use crate::core::netting::{compute_net_balances, participant_universe};
pub use crate::core::services::BalanceService;
pub use crate::core::simplifier::{apply_settlements, simplify};
pub use crate::core::views::ScopedBalanceView;
pub use infrastructure::cache::in_memory::InMemoryCache;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
