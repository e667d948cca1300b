use crate::config::Config;
use crate::constants::{
    BALANCES_QUERIED, EXPENSE_DELETED, EXPENSE_RECORDED, MAX_AMOUNT, MAX_ID_LENGTH, MAX_NAME_LENGTH, PARTICIPANT_REGISTERED,
    PARTICIPANT_REMOVED, TREND_QUERIED,
};
use crate::core::errors::BalanceError;
use crate::core::models::{
    AppLog, Expense, GroupBalance, GroupId, PairwiseBalances, Participant, ParticipantId, ParticipantSummary,
    ScopedBalances, Settlement, SplitPolicy, TrendPoint,
};
use crate::core::money;
use crate::core::views::ScopedBalanceView;
use crate::infrastructure::cache::{BalanceCache, cache_keys};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::ExpenseStore;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

/// Expense as submitted by a client, before an id is assigned.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewExpense {
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub payer_id: ParticipantId,
    pub split: SplitPolicy,
    pub group_id: Option<GroupId>,
    /// Defaults to the time of recording
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, example = "2024-06-03T09:00:00Z")]
    pub settled_at: Option<DateTime<Utc>>,
}

/// Settlement joined with participant profiles for display.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ResolvedSettlement {
    pub from: Participant,
    pub to: Participant,
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
}

pub struct BalanceService<L: LoggingService, S: ExpenseStore, C: BalanceCache> {
    storage: S,
    logging: L,
    cache: C,
    cache_ttl: Duration,
    default_trend_window_days: u32,
    max_trend_window_days: u32,
}

impl<L: LoggingService, S: ExpenseStore, C: BalanceCache> BalanceService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C, config: &Config) -> Self {
        info!("Initializing BalanceService");
        BalanceService {
            storage,
            logging,
            cache,
            cache_ttl: config.balance_cache_ttl(),
            default_trend_window_days: config.trend_window_days,
            max_trend_window_days: config.max_trend_window_days,
        }
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), BalanceError> {
        if value.trim().is_empty() {
            return Err(BalanceError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.len() > max_length {
            return Err(BalanceError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(BalanceError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: Decimal) -> Result<(), BalanceError> {
        if amount > MAX_AMOUNT {
            return Err(BalanceError::invalid_input(
                field,
                "Amount Too Large",
                format!("Amount cannot exceed {}", MAX_AMOUNT),
            ));
        }
        if amount.normalize().scale() > 2 {
            return Err(BalanceError::invalid_input(
                field,
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    async fn require_participant(&self, participant_id: &str) -> Result<Participant, BalanceError> {
        self.storage
            .get_participant(participant_id)
            .await?
            .ok_or_else(|| BalanceError::ParticipantNotFound(participant_id.to_string()))
    }

    /// Current expenses, rejected if any of them references a participant the
    /// directory no longer knows.
    async fn snapshot(&self) -> Result<Vec<Expense>, BalanceError> {
        let expenses = self.storage.list_expenses().await?;
        let known: HashSet<ParticipantId> = self
            .storage
            .list_participants()
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        for expense in &expenses {
            if let Some(orphan) = expense
                .referenced_participants()
                .into_iter()
                .find(|id| !known.contains(*id))
            {
                error!(
                    "Expense {} references participant {} missing from the directory",
                    expense.id, orphan
                );
                return Err(BalanceError::UnknownParticipant(orphan.clone()));
            }
        }

        debug!("Loaded snapshot of {} expenses", expenses.len());
        Ok(expenses)
    }

    async fn cached_scope<F>(&self, key: String, compute: F) -> Result<ScopedBalances, BalanceError>
    where
        F: FnOnce(&ScopedBalanceView<'_>) -> Result<ScopedBalances, BalanceError>,
    {
        if let Some(scope) = self.cache.get_scope(&key).await? {
            debug!("Cache hit for {}", key);
            return Ok(scope);
        }
        let generation = self.cache.generation().await?;
        let expenses = self.snapshot().await?;
        let scope = compute(&ScopedBalanceView::new(&expenses))?;
        if !self.cache.save_scope(&key, &scope, self.cache_ttl, generation).await? {
            debug!("Not caching {}: expenses changed while it was computed", key);
        }
        Ok(scope)
    }

    pub async fn register_participant(&self, participant: Participant) -> Result<Participant, BalanceError> {
        self.validate_string_input("id", &participant.id, MAX_ID_LENGTH)?;
        self.validate_string_input("name", &participant.name, MAX_NAME_LENGTH)?;

        if self.storage.get_participant(&participant.id).await?.is_some() {
            warn!("Participant {} already registered", participant.id);
            return Err(BalanceError::ParticipantAlreadyExists(participant.id));
        }

        info!("Registering participant {}", participant.id);
        self.storage.save_participant(participant.clone()).await?;
        self.logging
            .log_action(
                PARTICIPANT_REGISTERED,
                json!({ "participant_id": participant.id, "name": participant.name }),
                Some(&participant.id),
            )
            .await?;
        Ok(participant)
    }

    /// Drops the profile only. Expenses that still reference the participant
    /// make every later view fail with `UnknownParticipant` until they are deleted.
    pub async fn remove_participant(&self, participant_id: &str) -> Result<Participant, BalanceError> {
        let removed = self
            .storage
            .delete_participant(participant_id)
            .await?
            .ok_or_else(|| BalanceError::ParticipantNotFound(participant_id.to_string()))?;
        self.cache.invalidate_all().await?;

        info!("Removed participant {}", participant_id);
        self.logging
            .log_action(
                PARTICIPANT_REMOVED,
                json!({ "participant_id": participant_id }),
                Some(participant_id),
            )
            .await?;
        Ok(removed)
    }

    pub async fn get_participant(&self, participant_id: &str) -> Result<Option<Participant>, BalanceError> {
        self.storage.get_participant(participant_id).await
    }

    pub async fn list_participants(&self) -> Result<Vec<Participant>, BalanceError> {
        self.storage.list_participants().await
    }

    pub async fn record_expense(&self, new_expense: NewExpense) -> Result<Expense, BalanceError> {
        self.validate_string_input("payer_id", &new_expense.payer_id, MAX_ID_LENGTH)?;
        if let Some(group_id) = &new_expense.group_id {
            self.validate_string_input("group_id", group_id, MAX_ID_LENGTH)?;
        }
        self.validate_amount_input("amount", new_expense.amount)?;
        if let SplitPolicy::Unequal { shares } = &new_expense.split {
            for share in shares.values() {
                self.validate_amount_input("shares", *share)?;
            }
            if money::sum(shares.values())? != new_expense.amount {
                return Err(BalanceError::invalid_input(
                    "shares",
                    "Invalid Shares",
                    format!("shares must add up to exactly {}", new_expense.amount),
                ));
            }
        }

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            amount: new_expense.amount,
            payer_id: new_expense.payer_id,
            split: new_expense.split,
            group_id: new_expense.group_id,
            date: new_expense.date.unwrap_or_else(Utc::now),
            settled_at: new_expense.settled_at,
        };
        expense.validate().inspect_err(|e| warn!("Rejecting expense: {}", e))?;

        for participant_id in expense.referenced_participants() {
            if self.storage.get_participant(participant_id).await?.is_none() {
                warn!("Expense references unregistered participant {}", participant_id);
                return Err(BalanceError::UnknownParticipant(participant_id.clone()));
            }
        }

        info!(
            "Recording expense {} of {} paid by {}",
            expense.id, expense.amount, expense.payer_id
        );
        self.storage.save_expense(expense.clone()).await?;
        self.cache.invalidate_all().await?;

        self.logging
            .log_action(
                EXPENSE_RECORDED,
                json!({
                    "expense_id": expense.id,
                    "amount": expense.amount,
                    "payer_id": expense.payer_id,
                    "group_id": expense.group_id
                }),
                Some(&expense.payer_id),
            )
            .await?;
        Ok(expense)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<Expense, BalanceError> {
        let deleted = self
            .storage
            .delete_expense(expense_id)
            .await?
            .ok_or_else(|| BalanceError::ExpenseNotFound(expense_id.to_string()))?;
        self.cache.invalidate_all().await?;

        info!("Deleted expense {}", expense_id);
        self.logging
            .log_action(
                EXPENSE_DELETED,
                json!({ "expense_id": expense_id, "group_id": deleted.group_id }),
                None,
            )
            .await?;
        Ok(deleted)
    }

    pub async fn list_expenses(&self) -> Result<Vec<Expense>, BalanceError> {
        self.storage.list_expenses().await
    }

    pub async fn global_view(&self) -> Result<ScopedBalances, BalanceError> {
        let scope = self
            .cached_scope(cache_keys::global_balances_key(), |view| view.global())
            .await?;
        self.logging
            .log_action(BALANCES_QUERIED, json!({ "scope": "global" }), None)
            .await?;
        Ok(scope)
    }

    pub async fn group_view(&self, group_id: &str) -> Result<ScopedBalances, BalanceError> {
        self.validate_string_input("group_id", group_id, MAX_ID_LENGTH)?;
        let scope = self
            .cached_scope(cache_keys::group_balances_key(group_id), |view| view.group(group_id))
            .await?;
        self.logging
            .log_action(
                BALANCES_QUERIED,
                json!({ "scope": "group", "group_id": group_id }),
                None,
            )
            .await?;
        Ok(scope)
    }

    pub async fn pairwise_view(&self, first_id: &str, second_id: &str) -> Result<PairwiseBalances, BalanceError> {
        let (first, second) = futures::future::try_join(
            self.require_participant(first_id),
            self.require_participant(second_id),
        )
        .await?;

        let expenses = self.snapshot().await?;
        let pair = ScopedBalanceView::new(&expenses).pairwise(&first.id, &second.id)?;
        self.logging
            .log_action(
                BALANCES_QUERIED,
                json!({ "scope": "pair", "participants": [first.id, second.id] }),
                Some(first_id),
            )
            .await?;
        Ok(pair)
    }

    /// Daily balance series for a participant. `days` defaults to the configured
    /// window and `end` to today (UTC).
    pub async fn trend(
        &self,
        participant_id: &str,
        end: Option<NaiveDate>,
        days: Option<u32>,
    ) -> Result<Vec<TrendPoint>, BalanceError> {
        let days = days.unwrap_or(self.default_trend_window_days);
        if days > self.max_trend_window_days {
            return Err(BalanceError::invalid_input(
                "days",
                "Window Too Long",
                format!("trend window cannot exceed {} days", self.max_trend_window_days),
            ));
        }
        self.require_participant(participant_id).await?;

        let end = end.unwrap_or_else(|| Utc::now().date_naive());
        let expenses = self.snapshot().await?;
        let points = ScopedBalanceView::new(&expenses).trend(participant_id, end, days)?;
        self.logging
            .log_action(
                TREND_QUERIED,
                json!({ "participant_id": participant_id, "end": end, "days": days }),
                Some(participant_id),
            )
            .await?;
        Ok(points)
    }

    pub async fn participant_summary(&self, participant_id: &str) -> Result<ParticipantSummary, BalanceError> {
        self.require_participant(participant_id).await?;
        Ok(self.global_view().await?.summary_for(participant_id))
    }

    pub async fn group_breakdown(&self, participant_id: &str) -> Result<Vec<GroupBalance>, BalanceError> {
        self.require_participant(participant_id).await?;
        let expenses = self.snapshot().await?;
        let breakdown = ScopedBalanceView::new(&expenses).group_breakdown(participant_id)?;
        self.logging
            .log_action(
                BALANCES_QUERIED,
                json!({ "scope": "group_breakdown", "participant_id": participant_id }),
                Some(participant_id),
            )
            .await?;
        Ok(breakdown)
    }

    /// Attaches profiles to settlements. A settlement naming a participant the
    /// directory does not know is an error, never silently dropped.
    pub async fn resolve_settlements(
        &self,
        settlements: &[Settlement],
    ) -> Result<Vec<ResolvedSettlement>, BalanceError> {
        let mut resolved = Vec::with_capacity(settlements.len());
        for settlement in settlements {
            let from = self.lookup_for_settlement(&settlement.from).await?;
            let to = self.lookup_for_settlement(&settlement.to).await?;
            resolved.push(ResolvedSettlement {
                from,
                to,
                amount: settlement.amount,
            });
        }
        Ok(resolved)
    }

    async fn lookup_for_settlement(&self, participant_id: &str) -> Result<Participant, BalanceError> {
        self.storage.get_participant(participant_id).await?.ok_or_else(|| {
            error!("Settlement references unknown participant {}", participant_id);
            BalanceError::UnknownParticipant(participant_id.to_string())
        })
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, BalanceError> {
        self.logging.get_logs().await
    }
}
