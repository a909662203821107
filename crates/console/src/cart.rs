//! Session-lifetime shopping cart.
//!
//! Purely local state: created empty when the session starts, mutated only by
//! explicit adds, cleared wholesale once an order has been accepted, never
//! persisted. The cart reaches the backend exactly once, as the item list of
//! an order-creation payload.

use rust_decimal::Decimal;
use shopdeck_core::types::money;
use shopdeck_core::{NewOrderItem, ProductId};

/// One cart line.
///
/// Name and unit price are captured at add time; later catalog changes do not
/// touch lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        money::line_total(self.quantity, self.unit_price)
    }
}

/// Ordered sequence of cart lines, at most one per product.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line is appended with quantity 1. Always succeeds.
    pub fn add(&mut self, product_id: ProductId, name: &str, unit_price: Decimal) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product_id,
                name: name.to_string(),
                unit_price,
                quantity: 1,
            });
        }
    }

    /// Drop every line. Called only after an order was accepted.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Map the cart into an order-creation item list.
    #[must_use]
    pub fn to_order_items(&self) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                price_at_purchase: line.unit_price,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdeck_core::format_usd;

    fn ten() -> Decimal {
        Decimal::from(10)
    }

    #[test]
    fn readding_a_product_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Laptop", ten());
        cart.add(ProductId::new(1), "Laptop", ten());

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "A", ten());
        cart.add(ProductId::new(1), "A", ten());
        cart.add(ProductId::new(2), "B", Decimal::from(5));

        let line_sum: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
        assert_eq!(cart.total(), line_sum);
        assert_eq!(format_usd(cart.total()), "$25.00");
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(3), "C", ten());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn order_items_capture_price_at_add_time() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(7), "Widget", Decimal::new(1050, 2));
        cart.add(ProductId::new(7), "Widget", Decimal::new(1050, 2));

        let items = cart.to_order_items();
        assert_eq!(items.len(), 1);
        let item = items.first().expect("one item");
        assert_eq!(item.product_id, ProductId::new(7));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price_at_purchase, Decimal::new(1050, 2));
    }

    #[test]
    fn adds_preserve_insertion_order() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(2), "B", ten());
        cart.add(ProductId::new(1), "A", ten());
        cart.add(ProductId::new(2), "B", ten());

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);
    }
}
