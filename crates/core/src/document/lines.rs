//! Line and header total arithmetic.

use rust_decimal::Decimal;
use tectona_shared::types::Currency;

/// Computes a line total: `qty * unit_price * (1 + tax_rate/100)`,
/// rounded to the currency's minor unit.
///
/// The tax rate is a flat percentage (18 means 18%). Rounding happens
/// once, on the final product, so the header total is the sum of the
/// rounded line totals the customer actually sees.
#[must_use]
pub fn line_total(
    qty: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
    currency: Currency,
) -> Decimal {
    let gross = qty * unit_price * (Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED);
    currency.round(gross)
}

/// Sums already-rounded line totals into a document total.
#[must_use]
pub fn document_total(line_totals: &[Decimal]) -> Decimal {
    line_totals.iter().copied().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total_flat_tax() {
        // 5 * 12500 * 1.18 = 73750
        assert_eq!(
            line_total(dec!(5), dec!(12500), dec!(18), Currency::Idr),
            dec!(73750)
        );
    }

    #[test]
    fn test_line_total_no_tax() {
        assert_eq!(
            line_total(dec!(3), dec!(19.99), dec!(0), Currency::Usd),
            dec!(59.97)
        );
    }

    #[test]
    fn test_line_total_rounds_to_minor_unit() {
        // 1 * 10.33 * 1.07 = 11.0531 -> 11.05 in cents
        assert_eq!(
            line_total(dec!(1), dec!(10.33), dec!(7), Currency::Usd),
            dec!(11.05)
        );
        // Same math in a zero-decimal currency rounds to whole units.
        assert_eq!(
            line_total(dec!(1), dec!(10.33), dec!(7), Currency::Jpy),
            dec!(11)
        );
    }

    #[test]
    fn test_line_total_bankers_rounding() {
        // 1 * 1.25 * 1.00 with a half-cent midpoint: 1.125 -> 1.12
        assert_eq!(
            line_total(dec!(0.9), dec!(1.25), dec!(0), Currency::Usd),
            dec!(1.12)
        );
    }

    #[test]
    fn test_document_total() {
        assert_eq!(
            document_total(&[dec!(73750), dec!(1000), dec!(250)]),
            dec!(75000)
        );
        assert_eq!(document_total(&[]), dec!(0));
    }

    proptest! {
        /// Line totals never carry more precision than the currency allows.
        #[test]
        fn prop_line_total_respects_minor_units(
            qty in 1i64..1_000,
            unit_price_cents in 1i64..10_000_000,
            tax_rate in 0i64..40,
        ) {
            let total = line_total(
                Decimal::new(qty, 0),
                Decimal::new(unit_price_cents, 2),
                Decimal::new(tax_rate, 0),
                Currency::Usd,
            );
            prop_assert!(total.scale() <= 2);
        }

        /// A zero tax rate is a plain qty * price product.
        #[test]
        fn prop_zero_tax_is_plain_product(
            qty in 1i64..1_000,
            unit_price in 1i64..1_000_000,
        ) {
            let total = line_total(
                Decimal::new(qty, 0),
                Decimal::new(unit_price, 0),
                Decimal::ZERO,
                Currency::Idr,
            );
            prop_assert_eq!(total, Decimal::new(qty * unit_price, 0));
        }
    }
}
