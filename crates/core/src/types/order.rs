//! Order service wire types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, OrderId, OrderItemId, ProductId};
use super::status::OrderStatus;

/// An order as returned by the order service, with its nested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price captured when the order was placed.
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_purchase: Decimal,
    /// Server-computed `quantity * price_at_purchase`.
    #[serde(with = "rust_decimal::serde::float")]
    pub item_total: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /orders/`.
///
/// Status is deliberately absent: the service forces new orders to `pending`
/// and resolves them asynchronously.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: CustomerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// One line of an order-creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_purchase: Decimal,
}

/// Body of `PATCH /orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_payload_shape() {
        let payload = NewOrder {
            user_id: CustomerId::new(5),
            shipping_address: Some("1 Main St".to_string()),
            items: vec![NewOrderItem {
                product_id: ProductId::new(2),
                quantity: 3,
                price_at_purchase: Decimal::new(1050, 2),
            }],
        };
        let json = serde_json::to_value(&payload).expect("serialize failed");
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": 5,
                "shipping_address": "1 Main St",
                "items": [{"product_id": 2, "quantity": 3, "price_at_purchase": 10.5}]
            })
        );
    }

    #[test]
    fn status_update_body_matches_contract() {
        let body = StatusUpdate {
            status: OrderStatus::Shipped,
        };
        let json = serde_json::to_value(body).expect("serialize failed");
        assert_eq!(json, serde_json::json!({"status": "shipped"}));
    }

    #[test]
    fn deserializes_order_with_nested_items() {
        let body = r#"{
            "order_id": 9,
            "user_id": 5,
            "order_date": "2025-01-15T10:00:00Z",
            "status": "pending",
            "total_amount": 31.5,
            "shipping_address": null,
            "created_at": "2025-01-15T10:00:00Z",
            "items": [{
                "order_item_id": 1,
                "order_id": 9,
                "product_id": 2,
                "quantity": 3,
                "price_at_purchase": 10.5,
                "item_total": 31.5,
                "created_at": "2025-01-15T10:00:00Z"
            }]
        }"#;
        let order: Order = serde_json::from_str(body).expect("deserialize failed");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_amount, Decimal::new(315, 1));
    }
}
