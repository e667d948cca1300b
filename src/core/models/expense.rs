use super::participant::{GroupId, ParticipantId};
use crate::core::errors::BalanceError;
use crate::core::money::{self, EPSILON};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

/// How an expense's cost is charged to the people sharing it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// `amount / participants.len()` each
    Equal { participants: Vec<ParticipantId> },
    /// Explicit shares; must sum to the expense amount
    Unequal {
        #[schema(value_type = Object)]
        shares: IndexMap<ParticipantId, Decimal>,
    },
}

impl SplitPolicy {
    pub fn equal<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ParticipantId>,
    {
        SplitPolicy::Equal {
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unequal<I, S>(shares: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<ParticipantId>,
    {
        SplitPolicy::Unequal {
            shares: shares.into_iter().map(|(id, share)| (id.into(), share)).collect(),
        }
    }

    /// Participants charged by this split, in declaration order.
    pub fn participants(&self) -> Vec<&ParticipantId> {
        match self {
            SplitPolicy::Equal { participants } => participants.iter().collect(),
            SplitPolicy::Unequal { shares } => shares.keys().collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Expense {
    pub id: String,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub payer_id: ParticipantId,
    pub split: SplitPolicy,
    pub group_id: Option<GroupId>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    /// Set by the external settle-up workflow; only read by pair statistics.
    #[schema(value_type = Option<String>, example = "2024-06-03T09:00:00Z")]
    pub settled_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        payer_id: impl Into<ParticipantId>,
        split: SplitPolicy,
        date: DateTime<Utc>,
    ) -> Self {
        Expense {
            id: id.into(),
            amount,
            payer_id: payer_id.into(),
            split,
            group_id: None,
            date,
            settled_at: None,
        }
    }

    pub fn in_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn settled(mut self, settled_at: DateTime<Utc>) -> Self {
        self.settled_at = Some(settled_at);
        self
    }

    /// Payer followed by every split participant, without repeats.
    pub fn referenced_participants(&self) -> Vec<&ParticipantId> {
        let mut seen = HashSet::new();
        std::iter::once(&self.payer_id)
            .chain(self.split.participants())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn involves(&self, participant_id: &str) -> bool {
        self.payer_id == participant_id || self.split.participants().iter().any(|id| *id == participant_id)
    }

    /// Amount charged to each split participant. Call after `validate`.
    pub fn shares(&self) -> Vec<(&ParticipantId, Decimal)> {
        match &self.split {
            SplitPolicy::Equal { participants } => {
                if participants.is_empty() {
                    return Vec::new();
                }
                let share = self.amount / Decimal::from(participants.len());
                participants.iter().map(|id| (id, share)).collect()
            }
            SplitPolicy::Unequal { shares } => shares.iter().map(|(id, share)| (id, *share)).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), BalanceError> {
        if self.amount <= Decimal::ZERO {
            return Err(BalanceError::malformed(
                &self.id,
                format!("amount must be positive, got {}", self.amount),
            ));
        }

        match &self.split {
            SplitPolicy::Equal { participants } => {
                if participants.is_empty() {
                    return Err(BalanceError::malformed(&self.id, "equal split has no participants"));
                }
                let mut seen = HashSet::new();
                if let Some(duplicate) = participants.iter().find(|id| !seen.insert(*id)) {
                    return Err(BalanceError::malformed(
                        &self.id,
                        format!("participant {} listed more than once", duplicate),
                    ));
                }
            }
            SplitPolicy::Unequal { shares } => {
                if shares.is_empty() {
                    return Err(BalanceError::malformed(&self.id, "unequal split has no shares"));
                }
                if let Some((id, share)) = shares.iter().find(|(_, share)| **share < Decimal::ZERO) {
                    return Err(BalanceError::malformed(
                        &self.id,
                        format!("share for {} is negative ({})", id, share),
                    ));
                }
                let total = money::sum(shares.values())?;
                if (total - self.amount).abs() > EPSILON {
                    return Err(BalanceError::malformed(
                        &self.id,
                        format!("shares sum to {}, expected {}", total, self.amount),
                    ));
                }
            }
        }

        Ok(())
    }
}
