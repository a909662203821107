//! Order view: listing with nested items, placement, status updates,
//! deletion.

use shopdeck_core::{NewOrder, Order, OrderId, OrderItem, OrderStatus, format_usd};
use tabled::Tabled;

use crate::api::{ApiError, OrderFilter, OrdersApi};

#[derive(Tabled)]
struct OrderRow {
    id: i32,
    user: i32,
    placed: String,
    status: String,
    total: String,
    items: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.order_id.as_i32(),
            user: order.user_id.as_i32(),
            placed: order.order_date.format("%Y-%m-%d %H:%M").to_string(),
            status: order.status.to_string(),
            total: format_usd(order.total_amount),
            items: summarize_items(&order.items),
        }
    }
}

fn summarize_items(items: &[OrderItem]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "{}x #{} @ {}",
                item.quantity,
                item.product_id,
                format_usd(item.price_at_purchase)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The order list view.
pub struct OrdersView {
    api: OrdersApi,
    last_rendered: Option<Vec<Order>>,
}

impl OrdersView {
    #[must_use]
    pub const fn new(api: OrdersApi) -> Self {
        Self {
            api,
            last_rendered: None,
        }
    }

    /// Fetch orders (optionally filtered) and return the rendered table.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the order service.
    pub async fn refresh(&mut self, filter: OrderFilter) -> Result<String, ApiError> {
        let orders = self.api.list(filter).await?;
        let rendered = render(&orders);
        self.last_rendered = Some(orders);
        Ok(rendered)
    }

    /// Poll-driven refetch: renders only when the payload changed since the
    /// last render.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the order service.
    pub async fn poll(&mut self) -> Result<Option<String>, ApiError> {
        let orders = self.api.list(OrderFilter::default()).await?;
        if self.last_rendered.as_ref() == Some(&orders) {
            return Ok(None);
        }
        let rendered = render(&orders);
        self.last_rendered = Some(orders);
        Ok(Some(rendered))
    }

    /// Orders as of the last render.
    #[must_use]
    pub fn snapshot(&self) -> Option<&[Order]> {
        self.last_rendered.as_deref()
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the order service.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.api.create(order).await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the order service.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.api.set_status(id, status).await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the order service.
    pub async fn delete(&self, id: OrderId) -> Result<(), ApiError> {
        self.api.delete(id).await
    }

    /// The underlying client, for health probes.
    #[must_use]
    pub const fn api(&self) -> &OrdersApi {
        &self.api
    }
}

fn render(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "(no orders)".to_string();
    }
    let rows: Vec<OrderRow> = orders.iter().map(OrderRow::from).collect();
    super::render_table(&rows)
}
