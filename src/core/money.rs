use crate::core::errors::BalanceError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Tolerance shared by netting and simplification. Balances and transfers at or
/// below this magnitude are treated as settled.
pub const EPSILON: Decimal = dec!(0.01);

pub fn is_effectively_zero(amount: Decimal) -> bool {
    amount.abs() <= EPSILON
}

/// Display rounding only; the core keeps full precision.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Overflow-checked total.
pub fn sum<'a, I>(amounts: I) -> Result<Decimal, BalanceError>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| checked_add(acc, *amount))
}

pub fn checked_add(lhs: Decimal, rhs: Decimal) -> Result<Decimal, BalanceError> {
    lhs.checked_add(rhs)
        .ok_or_else(|| BalanceError::AmountOverflow(format!("{} + {} exceeds the representable range", lhs, rhs)))
}
