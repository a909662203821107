//! Fetch-and-render view components.
//!
//! Each view pairs one service client with its table rendering and, for the
//! catalog, the product cache the cart reads from. Views keep the last
//! payload they rendered so poll-driven refetches can skip reprinting an
//! unchanged table; manual refreshes always render.

mod catalog;
mod customers;
mod orders;

pub use catalog::CatalogView;
pub use customers::CustomerView;
pub use orders::OrdersView;

use shopdeck_core::format_usd;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cart::Cart;

pub(crate) fn render_table<R>(rows: &[R]) -> String
where
    R: Tabled,
{
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[derive(Tabled)]
struct CartRow {
    product: String,
    #[tabled(rename = "qty")]
    quantity: u32,
    #[tabled(rename = "unit price")]
    unit_price: String,
    #[tabled(rename = "line total")]
    line_total: String,
}

/// Render the cart: a placeholder when empty, otherwise one row per line
/// followed by the running total.
#[must_use]
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "(cart is empty)".to_string();
    }
    let rows: Vec<CartRow> = cart
        .lines()
        .iter()
        .map(|line| CartRow {
            product: line.name.clone(),
            quantity: line.quantity,
            unit_price: format_usd(line.unit_price),
            line_total: format_usd(line.line_total()),
        })
        .collect();
    format!(
        "{}\ntotal: {}",
        render_table(&rows),
        format_usd(cart.total())
    )
}
