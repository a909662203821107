//! Stub order service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

const KNOWN_STATUSES: &[&str] = &[
    "pending",
    "processing",
    "shipped",
    "confirmed",
    "failed",
    "cancelled",
    "completed",
];

#[derive(Clone, Default)]
struct OrderServiceState {
    orders: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicI32>,
    create_requests: Arc<AtomicUsize>,
    fail_next_create: Arc<AtomicBool>,
    last_status_body: Arc<Mutex<Option<Value>>>,
}

/// Handle on a running stub order service.
pub struct OrderStub {
    pub base_url: Url,
    state: OrderServiceState,
}

impl OrderStub {
    pub async fn spawn() -> Self {
        let state = OrderServiceState {
            next_id: Arc::new(AtomicI32::new(1)),
            ..OrderServiceState::default()
        };
        let router = Router::new()
            .route("/health", get(health))
            .route("/orders/", get(list).post(create))
            .route("/orders/{id}", axum::routing::delete(delete))
            .route("/orders/{id}/status", patch(set_status))
            .with_state(state.clone());
        let base_url = crate::serve(router).await;
        Self { base_url, state }
    }

    /// Number of `POST /orders/` requests that reached the service.
    #[must_use]
    pub fn create_requests(&self) -> usize {
        self.state.create_requests.load(Ordering::SeqCst)
    }

    /// Make the next order creation fail with a 500, as the real service does
    /// when its database or broker is down.
    pub fn fail_next_create(&self) {
        self.state.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// The body of the last `PATCH .../status` request, exactly as received.
    #[must_use]
    pub fn last_status_body(&self) -> Option<Value> {
        self.state.last_status_body.lock().expect("state lock").clone()
    }

    /// Current service-side order list.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state.orders.lock().expect("state lock").clone()
    }

    /// Flip an order's status directly, the way the real service's message
    /// consumer does when stock processing resolves.
    pub fn resolve_status(&self, id: i32, status: &str) {
        let mut orders = self.state.orders.lock().expect("state lock");
        if let Some(order) = orders.iter_mut().find(|o| o["order_id"] == json!(id)) {
            order["status"] = json!(status);
            order["updated_at"] = json!(crate::now());
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "order-service"}))
}

async fn list(
    State(state): State<OrderServiceState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let orders = state.orders.lock().expect("state lock");
    let filtered: Vec<Value> = orders
        .iter()
        .filter(|order| {
            params
                .get("status")
                .is_none_or(|status| order["status"] == json!(status))
        })
        .filter(|order| {
            params
                .get("user_id")
                .is_none_or(|user| order["user_id"].to_string() == *user)
        })
        .cloned()
        .collect();
    Json(Value::Array(filtered))
}

async fn create(State(state): State<OrderServiceState>, Json(body): Json<Value>) -> Response {
    state.create_requests.fetch_add(1, Ordering::SeqCst);

    if state.fail_next_create.swap(false, Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Could not create order or publish event. Please check logs."})),
        )
            .into_response();
    }

    let Some(items) = body["items"].as_array().filter(|items| !items.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Order must contain at least one item."})),
        )
            .into_response();
    };

    let order_id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut total = 0.0;
    let mut order_items = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let quantity = item["quantity"].as_f64().unwrap_or_default();
        let price = item["price_at_purchase"].as_f64().unwrap_or_default();
        let item_total = quantity * price;
        total += item_total;
        order_items.push(json!({
            "order_item_id": index + 1,
            "order_id": order_id,
            "product_id": item["product_id"],
            "quantity": item["quantity"],
            "price_at_purchase": item["price_at_purchase"],
            "item_total": item_total,
            "created_at": crate::now(),
            "updated_at": null,
        }));
    }

    let order = json!({
        "order_id": order_id,
        "user_id": body["user_id"],
        "order_date": crate::now(),
        "status": "pending",
        "total_amount": total,
        "shipping_address": body.get("shipping_address").cloned().unwrap_or(Value::Null),
        "created_at": crate::now(),
        "updated_at": null,
        "items": order_items,
    });
    state.orders.lock().expect("state lock").push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn set_status(
    State(state): State<OrderServiceState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    *state.last_status_body.lock().expect("state lock") = Some(body.clone());

    let Some(status) = body["status"].as_str() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "status"], "msg": "field required"}]})),
        )
            .into_response();
    };
    if !KNOWN_STATUSES.contains(&status) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "status"], "msg": "unknown status"}]})),
        )
            .into_response();
    }

    let mut orders = state.orders.lock().expect("state lock");
    let Some(order) = orders.iter_mut().find(|o| o["order_id"] == json!(id)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Order not found"})),
        )
            .into_response();
    };
    order["status"] = json!(status);
    order["updated_at"] = json!(crate::now());
    Json(order.clone()).into_response()
}

async fn delete(State(state): State<OrderServiceState>, Path(id): Path<i32>) -> Response {
    let mut orders = state.orders.lock().expect("state lock");
    let before = orders.len();
    orders.retain(|o| o["order_id"] != json!(id));
    if orders.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Order not found"})),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
