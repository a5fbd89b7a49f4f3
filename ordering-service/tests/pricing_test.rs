//! Pricing calculator tests.

use ordering_service::services::pricing;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn computes_total_discount_and_final_price() {
    let prices = pricing::compute(Some(dec!(1000)), 3, Some(dec!(10)));

    assert_eq!(prices.total_price, dec!(3000));
    assert_eq!(prices.discount_amount, dec!(300.00));
    assert_eq!(prices.final_price, dec!(2700.00));
}

#[test]
fn missing_discount_means_no_discount() {
    let prices = pricing::compute(Some(dec!(250.50)), 4, None);

    assert_eq!(prices.total_price, dec!(1002.00));
    assert_eq!(prices.discount_amount, Decimal::ZERO);
    assert_eq!(prices.final_price, dec!(1002.00));
}

#[test]
fn missing_unit_price_prices_the_line_at_zero() {
    let prices = pricing::compute(None, 7, Some(dec!(25)));

    assert_eq!(prices.total_price, Decimal::ZERO);
    assert_eq!(prices.discount_amount, Decimal::ZERO);
    assert_eq!(prices.final_price, Decimal::ZERO);
}

#[test]
fn discount_rounds_half_away_from_zero() {
    // 1 x 1.00 at 1.5% = 0.015, which rounds up to 0.02.
    let prices = pricing::compute(Some(dec!(1.00)), 1, Some(dec!(1.5)));

    assert_eq!(prices.discount_amount, dec!(0.02));
    assert_eq!(prices.final_price, dec!(0.98));
}

#[test]
fn discount_rounds_down_below_midpoint() {
    // 1 x 10.01 at 2.5% = 0.25025, which rounds down to 0.25.
    let prices = pricing::compute(Some(dec!(10.01)), 1, Some(dec!(2.5)));

    assert_eq!(prices.discount_amount, dec!(0.25));
    assert_eq!(prices.final_price, dec!(9.76));
}

#[test]
fn full_discount_never_goes_negative() {
    let prices = pricing::compute(Some(dec!(999.99)), 3, Some(dec!(100)));

    assert_eq!(prices.discount_amount, prices.total_price);
    assert_eq!(prices.final_price, Decimal::ZERO);
}

#[test]
fn no_floating_point_drift_on_large_amounts() {
    let prices = pricing::compute(Some(dec!(1000000000)), 2, Some(dec!(10)));

    assert_eq!(prices.total_price, dec!(2000000000));
    assert_eq!(prices.discount_amount, dec!(200000000.00));
    assert_eq!(prices.final_price, dec!(1800000000.00));
}

#[test]
fn header_discount_uses_the_same_rounding() {
    assert_eq!(pricing::discount(dec!(1.00), dec!(1.5)), dec!(0.02));
    assert_eq!(pricing::discount(dec!(2000000000), dec!(10)), dec!(200000000.00));
    assert_eq!(pricing::discount(dec!(500), Decimal::ZERO), Decimal::ZERO);
}
