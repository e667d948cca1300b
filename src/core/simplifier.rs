use crate::core::errors::BalanceError;
use crate::core::models::{NetBalances, ParticipantId, Settlement};
use crate::core::money::{self, EPSILON, is_effectively_zero};
use log::{debug, error};
use rust_decimal::Decimal;

/// Turns net balances into directed transfers that bring every balance to zero.
///
/// Creditors (balance > `EPSILON`) and debtors (balance < -`EPSILON`) are taken
/// in the map's insertion order and matched greedily with two pointers: each
/// step moves `min(debt, credit)` from the current debtor to the current
/// creditor and advances whichever side is exhausted. Participants are not
/// sorted by magnitude, so the plan is not guaranteed to be minimal, but the
/// same map in the same order always yields the same list.
///
/// Emits at most `nonzero participants - 1` settlements. Balances within
/// `EPSILON` of zero are never touched, so their total is the most any
/// participant can be left holding once the plan is paid.
pub fn simplify(balances: &NetBalances) -> Result<Vec<Settlement>, BalanceError> {
    debug!("Simplifying debts with balances: {:?}", balances);

    let mut creditors: Vec<(&ParticipantId, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance > EPSILON)
        .map(|(id, balance)| (id, *balance))
        .collect();
    let mut debtors: Vec<(&ParticipantId, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance < -EPSILON)
        .map(|(id, balance)| (id, -*balance))
        .collect();

    let total_credit = money::sum(balances.values().filter(|b| b.is_sign_positive()))?;
    let total_debit = money::sum(balances.values().filter(|b| b.is_sign_negative()))?;
    let total = total_credit + total_debit;
    if total.abs() > EPSILON {
        error!(
            "Cannot settle: credits {} do not match debits {}",
            total_credit,
            -total_debit
        );
        return Err(BalanceError::BalanceInvariantViolated(format!(
            "total credits {} do not match total debits {}",
            total_credit,
            -total_debit
        )));
    }

    let mut settlements = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let (debtor_id, debt) = debtors[i];
        let (creditor_id, credit) = creditors[j];
        let amount = debt.min(credit);

        if amount > EPSILON {
            settlements.push(Settlement {
                from: debtor_id.clone(),
                to: creditor_id.clone(),
                amount,
            });
        }

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1 <= EPSILON {
            i += 1;
        }
        if creditors[j].1 <= EPSILON {
            j += 1;
        }
    }

    // Sub-threshold balances are never settled; whatever they leave behind may
    // stay on the side that was not exhausted, but nothing beyond that.
    let dust: Decimal = balances
        .values()
        .filter(|b| is_effectively_zero(**b))
        .map(|b| b.abs())
        .chain(debtors[..i].iter().chain(creditors[..j].iter()).map(|(_, rest)| *rest))
        .sum();
    let unresolved: Decimal = debtors[i..]
        .iter()
        .chain(creditors[j..].iter())
        .map(|(_, rest)| *rest)
        .sum();
    if unresolved > EPSILON + dust {
        error!(
            "Settlement sweep left {} unresolved (dust {}): debtors {:?}, creditors {:?}",
            unresolved,
            dust,
            &debtors[i..],
            &creditors[j..]
        );
        return Err(BalanceError::BalanceInvariantViolated(format!(
            "{} left unresolved after settlement",
            unresolved
        )));
    }

    debug!("Simplified debts: {:?}", settlements);
    Ok(settlements)
}

/// Balances after every settlement has been paid.
pub fn apply_settlements(balances: &NetBalances, settlements: &[Settlement]) -> Result<NetBalances, BalanceError> {
    let mut settled = balances.clone();
    for settlement in settlements {
        let from = settled
            .get_mut(&settlement.from)
            .ok_or_else(|| BalanceError::UnknownParticipant(settlement.from.clone()))?;
        *from += settlement.amount;
        let to = settled
            .get_mut(&settlement.to)
            .ok_or_else(|| BalanceError::UnknownParticipant(settlement.to.clone()))?;
        *to -= settlement.amount;
    }
    Ok(settled)
}
