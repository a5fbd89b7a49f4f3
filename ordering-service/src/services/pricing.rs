//! Line price computation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Result of pricing one line: gross total, discount, and net price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePricing {
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// Compute line totals from unit price, quantity, and discount percentage.
///
/// Takes every pricing input at once and computes once, so there is no
/// observable assignment order. Never fails: a missing unit price prices
/// the line at zero, keeping order totals computable while upstream data is
/// incomplete (required-field validation belongs to the service boundary,
/// not here). The discount is rounded to 2 decimal places, half away from
/// zero.
pub fn compute(
    unit_price: Option<Decimal>,
    quantity: i32,
    discount_percent: Option<Decimal>,
) -> LinePricing {
    let unit_price = unit_price.unwrap_or(Decimal::ZERO);
    let discount_percent = discount_percent.unwrap_or(Decimal::ZERO);

    let total_price = unit_price * Decimal::from(quantity);
    let discount_amount = discount(total_price, discount_percent);
    let final_price = total_price - discount_amount;

    LinePricing {
        total_price,
        discount_amount,
        final_price,
    }
}

/// Discount amount for a gross value, rounded to 2 decimal places half-up.
/// Also used for the header-level override discount on a quotation subtotal.
pub fn discount(gross: Decimal, percent: Decimal) -> Decimal {
    (gross * percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
