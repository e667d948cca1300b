use crate::core::errors::BalanceError;
use crate::core::models::{
    Expense, GroupBalance, GroupId, PairStatistics, PairwiseBalances, ParticipantSummary, ScopedBalances, TrendPoint,
};
use crate::core::money;
use crate::core::netting::{compute_net_balances, participant_universe};
use crate::core::simplifier::simplify;
use chrono::{Days, NaiveDate};
use indexmap::{IndexMap, IndexSet};
use log::debug;

/// Read-only balance queries over one snapshot of expenses.
///
/// Every query filters the snapshot, derives the participant universe from the
/// filtered subset and runs netting then simplification from scratch.
pub struct ScopedBalanceView<'a> {
    expenses: &'a [Expense],
}

impl<'a> ScopedBalanceView<'a> {
    pub fn new(expenses: &'a [Expense]) -> Self {
        ScopedBalanceView { expenses }
    }

    pub fn global(&self) -> Result<ScopedBalances, BalanceError> {
        debug!("Computing global view over {} expenses", self.expenses.len());
        settle(self.expenses)
    }

    pub fn group(&self, group_id: &str) -> Result<ScopedBalances, BalanceError> {
        debug!("Computing group view for {}", group_id);
        self.scoped(|e| e.group_id.as_deref() == Some(group_id))
    }

    /// Expenses not tagged with any group.
    pub fn personal(&self) -> Result<ScopedBalances, BalanceError> {
        self.scoped(|e| e.group_id.is_none())
    }

    /// Netting restricted to expenses both participants took part in, plus
    /// volume and latency statistics over the same subset.
    pub fn pairwise(&self, first: &str, second: &str) -> Result<PairwiseBalances, BalanceError> {
        if first == second {
            return Err(BalanceError::invalid_input(
                "participants",
                "Invalid pair",
                "a pair needs two distinct participants",
            ));
        }
        debug!("Computing pairwise view for {} and {}", first, second);

        let subset = self.filtered(|e| e.involves(first) && e.involves(second));
        let scope = settle(&subset)?;

        let mut payment_counts = IndexMap::new();
        payment_counts.insert(first.to_string(), 0usize);
        payment_counts.insert(second.to_string(), 0usize);
        for expense in &subset {
            if let Some(count) = payment_counts.get_mut(expense.payer_id.as_str()) {
                *count += 1;
            }
        }

        let latencies: Vec<i64> = subset
            .iter()
            .filter_map(|e| e.settled_at.map(|at| (at - e.date).num_seconds()))
            .collect();
        let average_settlement_latency_secs = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<i64>() / latencies.len() as i64)
        };

        let statistics = PairStatistics {
            expense_count: subset.len(),
            total_volume: money::sum(subset.iter().map(|e| &e.amount))?,
            payment_counts,
            average_settlement_latency_secs,
        };

        Ok(PairwiseBalances { scope, statistics })
    }

    /// Daily net balance of `participant_id` for the `window_days` days ending at `end`.
    ///
    /// Each point is an independent global computation over expenses dated on
    /// or before that day, so cost grows with `window_days * expenses`.
    pub fn trend(&self, participant_id: &str, end: NaiveDate, window_days: u32) -> Result<Vec<TrendPoint>, BalanceError> {
        if window_days == 0 {
            return Err(BalanceError::invalid_input(
                "days",
                "Invalid window",
                "trend window must cover at least one day",
            ));
        }
        let start = end
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .ok_or_else(|| {
                BalanceError::invalid_input("days", "Invalid window", "trend window starts before the calendar")
            })?;
        debug!(
            "Computing {}-day trend for {} from {} to {}",
            window_days, participant_id, start, end
        );

        start
            .iter_days()
            .take(window_days as usize)
            .map(|day| {
                let prefix = self.filtered(|e| e.date.date_naive() <= day);
                let scope = settle(&prefix)?;
                Ok(TrendPoint {
                    date: day,
                    net_balance: scope.balance_of(participant_id),
                })
            })
            .collect()
    }

    /// Dashboard totals for one participant over the global view.
    pub fn participant_summary(&self, participant_id: &str) -> Result<ParticipantSummary, BalanceError> {
        Ok(self.global()?.summary_for(participant_id))
    }

    /// Net balance of `participant_id` inside every group they took part in,
    /// in order of first appearance. Personal expenses report under `None`.
    pub fn group_breakdown(&self, participant_id: &str) -> Result<Vec<GroupBalance>, BalanceError> {
        let groups: IndexSet<Option<GroupId>> = self
            .expenses
            .iter()
            .filter(|e| e.involves(participant_id))
            .map(|e| e.group_id.clone())
            .collect();

        groups
            .into_iter()
            .map(|group_id| {
                let scope = match &group_id {
                    Some(id) => self.group(id)?,
                    None => self.personal()?,
                };
                Ok(GroupBalance {
                    net_balance: scope.balance_of(participant_id),
                    group_id,
                })
            })
            .collect()
    }

    fn scoped<F>(&self, predicate: F) -> Result<ScopedBalances, BalanceError>
    where
        F: Fn(&Expense) -> bool,
    {
        settle(&self.filtered(predicate))
    }

    fn filtered<F>(&self, predicate: F) -> Vec<Expense>
    where
        F: Fn(&Expense) -> bool,
    {
        self.expenses.iter().filter(|&e| predicate(e)).cloned().collect()
    }
}

fn settle(expenses: &[Expense]) -> Result<ScopedBalances, BalanceError> {
    let universe = participant_universe(expenses);
    let balances = compute_net_balances(expenses, &universe)?;
    let settlements = simplify(&balances)?;
    Ok(ScopedBalances { balances, settlements })
}

