use crate::core::errors::BalanceError;
use crate::core::models::{Expense, NetBalances, ParticipantId};
use crate::core::money::{self, EPSILON};
use indexmap::IndexSet;
use log::{debug, error, warn};
use rust_decimal::Decimal;

/// Every id an expense set touches, in first-appearance order (payer before splitters).
pub fn participant_universe(expenses: &[Expense]) -> IndexSet<ParticipantId> {
    let mut ids = IndexSet::new();
    for expense in expenses {
        for id in expense.referenced_participants() {
            if !ids.contains(id) {
                ids.insert(id.clone());
            }
        }
    }
    ids
}

/// Folds `expenses` into a signed balance per participant.
///
/// The payer is credited with the sum of the shares charged, which equals the
/// amount up to the drift `Expense::validate` tolerates.
///
/// The result holds exactly the ids of `participant_ids`, in that order, zero
/// balances included. All expenses are validated before any is applied, so a
/// malformed expense or an id outside the universe fails the whole call.
pub fn compute_net_balances(
    expenses: &[Expense],
    participant_ids: &IndexSet<ParticipantId>,
) -> Result<NetBalances, BalanceError> {
    debug!(
        "Computing net balances for {} expenses across {} participants",
        expenses.len(),
        participant_ids.len()
    );

    for expense in expenses {
        expense.validate().inspect_err(|e| warn!("Rejecting expense: {}", e))?;
        if let Some(unknown) = expense
            .referenced_participants()
            .into_iter()
            .find(|id| !participant_ids.contains(*id))
        {
            warn!("Expense {} references unknown participant {}", expense.id, unknown);
            return Err(BalanceError::UnknownParticipant(unknown.clone()));
        }
    }

    let mut balances: NetBalances = participant_ids.iter().map(|id| (id.clone(), Decimal::ZERO)).collect();

    for expense in expenses {
        let shares = expense.shares();
        // Credit what was actually charged so share drift stays with the payer
        let charged = money::sum(shares.iter().map(|(_, share)| share))?;
        adjust(&mut balances, &expense.payer_id, charged)?;
        for (id, share) in shares {
            adjust(&mut balances, id, -share)?;
        }
    }

    let total = money::sum(balances.values())?;
    if total.abs() > EPSILON {
        error!("Net balances sum to {} instead of zero: {:?}", total, balances);
        return Err(BalanceError::BalanceInvariantViolated(format!(
            "net balances sum to {}",
            total
        )));
    }

    debug!("Net balances computed: {:?}", balances);
    Ok(balances)
}

fn adjust(balances: &mut NetBalances, id: &ParticipantId, delta: Decimal) -> Result<(), BalanceError> {
    let balance = balances
        .get_mut(id)
        .ok_or_else(|| BalanceError::UnknownParticipant(id.clone()))?;
    *balance = money::checked_add(*balance, delta)?;
    Ok(())
}
