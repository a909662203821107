//! Money display helpers.
//!
//! The services keep prices as decimals and put them on the wire as JSON
//! numbers. All arithmetic stays in [`Decimal`]; formatting to a currency
//! string happens only at render time.

use rust_decimal::Decimal;

/// Format a decimal amount as a dollar string with two decimal places.
///
/// ```
/// # use rust_decimal::Decimal;
/// # use shopdeck_core::format_usd;
/// assert_eq!(format_usd(Decimal::new(2500, 2)), "$25.00");
/// assert_eq!(format_usd(Decimal::from(5)), "$5.00");
/// ```
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Line total for a quantity of items at a unit price.
#[must_use]
pub fn line_total(quantity: u32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimal_places() {
        assert_eq!(format_usd(Decimal::new(999, 2)), "$9.99");
        assert_eq!(format_usd(Decimal::new(105, 1)), "$10.50");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn line_totals_multiply_exactly() {
        let unit = Decimal::new(1999, 2); // 19.99
        assert_eq!(line_total(3, unit), Decimal::new(5997, 2));
    }
}
