mod service_tests;

use crate::config::Config;
use crate::core::models::{Expense, NetBalances, SplitPolicy};
use crate::core::services::BalanceService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

pub fn create_test_service() -> BalanceService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    BalanceService::new(storage, logging, cache, &Config::default())
}

/// Noon UTC on the given day.
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn equal_expense(id: &str, amount: Decimal, payer: &str, participants: &[&str]) -> Expense {
    Expense::new(
        id,
        amount,
        payer,
        SplitPolicy::equal(participants.iter().copied()),
        day(2024, 6, 1),
    )
}

pub fn unequal_expense(id: &str, amount: Decimal, payer: &str, shares: &[(&str, Decimal)]) -> Expense {
    Expense::new(
        id,
        amount,
        payer,
        SplitPolicy::unequal(shares.iter().copied()),
        day(2024, 6, 1),
    )
}

pub fn balances(entries: &[(&str, Decimal)]) -> NetBalances {
    entries.iter().map(|(id, balance)| (id.to_string(), *balance)).collect()
}
