//! Product service wire types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as returned by the product service.
///
/// Server-owned; the client only keeps read copies in its catalog cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /products/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update payload for `PUT /products/{id}`.
///
/// Only the populated fields are sent; the service leaves the rest unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_response() {
        let body = r#"{
            "product_id": 1,
            "name": "Laptop",
            "description": "A laptop",
            "price": 999.99,
            "stock_quantity": 10,
            "image_url": null,
            "created_at": "2025-01-15T10:00:00Z",
            "updated_at": null
        }"#;
        let product: Product = serde_json::from_str(body).expect("deserialize failed");
        assert_eq!(product.product_id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(99999, 2));
        assert_eq!(product.stock_quantity, 10);
    }

    #[test]
    fn create_payload_serializes_price_as_number() {
        let payload = NewProduct {
            name: "Mouse".to_string(),
            description: None,
            price: Decimal::new(2550, 2),
            stock_quantity: 4,
            image_url: None,
        };
        let json = serde_json::to_value(&payload).expect("serialize failed");
        assert_eq!(json["price"], serde_json::json!(25.5));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn update_payload_omits_unset_fields() {
        let payload = ProductUpdate {
            stock_quantity: Some(3),
            ..ProductUpdate::default()
        };
        let json = serde_json::to_value(&payload).expect("serialize failed");
        assert_eq!(json, serde_json::json!({"stock_quantity": 3}));
    }
}
