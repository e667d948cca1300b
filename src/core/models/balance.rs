use super::participant::{GroupId, ParticipantId};
use super::settlement::Settlement;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Participant -> signed balance. Positive is owed, negative owes.
/// Iteration order is insertion order and drives settlement matching.
pub type NetBalances = IndexMap<ParticipantId, Decimal>;

/// Net balances and their settlement plan for one filtered expense set.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ScopedBalances {
    #[schema(value_type = Object)]
    pub balances: NetBalances,
    pub settlements: Vec<Settlement>,
}

impl ScopedBalances {
    pub fn balance_of(&self, participant_id: &str) -> Decimal {
        self.balances.get(participant_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of settlements paid to `participant_id`.
    pub fn total_owed_to(&self, participant_id: &str) -> Decimal {
        self.settlements
            .iter()
            .filter(|s| s.to == participant_id)
            .map(|s| s.amount)
            .sum()
    }

    /// Dashboard totals for `participant_id` within this scope.
    pub fn summary_for(&self, participant_id: &str) -> ParticipantSummary {
        ParticipantSummary {
            participant_id: participant_id.to_string(),
            owed_to: self.total_owed_to(participant_id),
            owes: self.total_owed_by(participant_id),
            net: self.balance_of(participant_id),
        }
    }

    /// Sum of settlements paid by `participant_id`.
    pub fn total_owed_by(&self, participant_id: &str) -> Decimal {
        self.settlements
            .iter()
            .filter(|s| s.from == participant_id)
            .map(|s| s.amount)
            .sum()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub participant_id: ParticipantId,
    #[schema(value_type = String)]
    pub owed_to: Decimal,
    #[schema(value_type = String)]
    pub owes: Decimal,
    #[schema(value_type = String)]
    pub net: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PairStatistics {
    pub expense_count: usize,
    #[schema(value_type = String)]
    pub total_volume: Decimal,
    /// Expenses fronted by each of the two participants, first participant first
    #[schema(value_type = Object)]
    pub payment_counts: IndexMap<ParticipantId, usize>,
    /// Mean of `settled_at - date` over expenses that have been settled
    pub average_settlement_latency_secs: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PairwiseBalances {
    pub scope: ScopedBalances,
    pub statistics: PairStatistics,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TrendPoint {
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub net_balance: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GroupBalance {
    /// `None` for personal expenses
    pub group_id: Option<GroupId>,
    #[schema(value_type = String)]
    pub net_balance: Decimal,
}
