//! Order service client.

use shopdeck_core::{CustomerId, NewOrder, Order, OrderId, OrderStatus, StatusUpdate};
use tracing::instrument;

use super::{ApiError, Health, RestClient};

/// Optional server-side filters for order listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user: Option<CustomerId>,
}

/// Typed client for the order service.
#[derive(Clone)]
pub struct OrdersApi {
    rest: RestClient,
}

impl OrdersApi {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// List orders with their nested items.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(user) = filter.user {
            query.push(("user_id", user.to_string()));
        }
        self.rest.get_json("/orders/", &query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        self.rest.get_json(&format!("/orders/{id}"), &[]).await
    }

    /// Place an order. The service accepts it as `pending` and resolves the
    /// final status asynchronously once stock has been processed.
    #[instrument(skip(self, order), fields(user = %order.user_id, lines = order.items.len()))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.rest.post_json("/orders/", order).await
    }

    /// Update an order's status. The new status travels as a JSON body.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.rest
            .patch_json(&format!("/orders/{id}/status"), &StatusUpdate { status })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), ApiError> {
        self.rest.delete(&format!("/orders/{id}")).await
    }

    /// Service health probe.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.rest.get_json("/health", &[]).await
    }
}
