//! Cashback Ledger
//!
//! Loyalty points are redeemed against an order's price and then accrued on whatever is
//! left to pay. A charge is never reduced below one minor unit by redemption, and a
//! balance never goes negative.

use rust_decimal::Decimal;

use crate::percent::Percent;

/// System-wide cashback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashbackPolicy {
    /// Rate used when accruing points on a purchase.
    pub redemption_rate: Percent,

    /// Balance a user must strictly exceed before points can be redeemed.
    pub minimum_balance_to_redeem: Decimal,
}

/// Outcome of redeeming points against a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redemption {
    /// Price left to pay after redemption.
    pub price: Decimal,

    /// Points taken from the balance.
    pub points_spent: Decimal,
}

/// Outcome of the full redeem-then-accrue cycle for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashbackSettlement {
    /// Price left to pay after redemption.
    pub price: Decimal,

    /// Balance before the order.
    pub balance_before: Decimal,

    /// Points taken from the balance.
    pub points_spent: Decimal,

    /// Points earned on the final price.
    pub points_earned: Decimal,

    /// Balance after redemption and accrual.
    pub balance_after: Decimal,
}

/// Whether a balance is large enough to redeem under `policy`.
pub fn can_redeem(balance: Decimal, policy: &CashbackPolicy) -> bool {
    balance > policy.minimum_balance_to_redeem
}

/// Redeems as many points as possible against `price` without dropping it below one.
pub fn redeem(price: Decimal, balance: Decimal, policy: &CashbackPolicy) -> Redemption {
    let untouched = Redemption {
        price,
        points_spent: Decimal::ZERO,
    };

    if !can_redeem(balance, policy) || price <= Decimal::ONE {
        return untouched;
    }

    if balance >= price {
        return Redemption {
            price: Decimal::ONE,
            points_spent: price - Decimal::ONE,
        };
    }

    Redemption {
        price: price - balance,
        points_spent: balance,
    }
}

/// Points earned on `final_price` under `policy`.
pub fn points_earned(final_price: Decimal, policy: &CashbackPolicy) -> Decimal {
    policy
        .redemption_rate
        .take_off(final_price.max(Decimal::ZERO))
}

/// Balance after accruing points on `final_price`, or `None` when the balance would overflow.
pub fn accrue(
    final_price: Decimal,
    remaining_balance: Decimal,
    policy: &CashbackPolicy,
) -> Option<Decimal> {
    remaining_balance.checked_add(points_earned(final_price, policy))
}

/// Runs redemption (when requested) and accrual for one order.
///
/// Returns `None` when the accrued balance does not fit in a [`Decimal`].
pub fn settle(
    price: Decimal,
    balance: Decimal,
    redeem_requested: bool,
    policy: &CashbackPolicy,
) -> Option<CashbackSettlement> {
    let redemption = if redeem_requested {
        redeem(price, balance, policy)
    } else {
        Redemption {
            price,
            points_spent: Decimal::ZERO,
        }
    };

    let remaining = balance - redemption.points_spent;

    Some(CashbackSettlement {
        price: redemption.price,
        balance_before: balance,
        points_spent: redemption.points_spent,
        points_earned: points_earned(redemption.price, policy),
        balance_after: accrue(redemption.price, remaining, policy)?,
    })
}
