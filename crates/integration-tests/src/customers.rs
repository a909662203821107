//! Stub customer service.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

#[derive(Clone, Default)]
struct CustomerServiceState {
    customers: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicI32>,
    last_create_body: Arc<Mutex<Option<Value>>>,
}

/// Handle on a running stub customer service.
pub struct CustomerStub {
    pub base_url: Url,
    state: CustomerServiceState,
}

impl CustomerStub {
    pub async fn spawn() -> Self {
        let state = CustomerServiceState {
            next_id: Arc::new(AtomicI32::new(1)),
            ..CustomerServiceState::default()
        };
        let router = Router::new()
            .route("/health", get(health))
            .route("/customers/", get(list).post(create))
            .route("/customers/{id}", axum::routing::delete(delete))
            .with_state(state.clone());
        let base_url = crate::serve(router).await;
        Self { base_url, state }
    }

    /// Insert a customer directly, returning its id.
    pub fn seed(&self, email: &str, first: &str, last: &str) -> i32 {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state
            .customers
            .lock()
            .expect("state lock")
            .push(json!({
                "customer_id": id,
                "email": email,
                "first_name": first,
                "last_name": last,
                "phone_number": null,
                "shipping_address": null,
                "created_at": crate::now(),
                "updated_at": null,
            }));
        id
    }

    /// Current service-side customer list.
    #[must_use]
    pub fn customers(&self) -> Vec<Value> {
        self.state.customers.lock().expect("state lock").clone()
    }

    /// The body of the last `POST /customers/`, exactly as received.
    #[must_use]
    pub fn last_create_body(&self) -> Option<Value> {
        self.state
            .last_create_body
            .lock()
            .expect("state lock")
            .clone()
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "customer-service"}))
}

async fn list(State(state): State<CustomerServiceState>) -> Json<Value> {
    Json(Value::Array(
        state.customers.lock().expect("state lock").clone(),
    ))
}

async fn create(
    State(state): State<CustomerServiceState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    *state.last_create_body.lock().expect("state lock") = Some(body.clone());

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    // The password is accepted but never echoed back.
    let customer = json!({
        "customer_id": id,
        "email": body["email"],
        "first_name": body["first_name"],
        "last_name": body["last_name"],
        "phone_number": body.get("phone_number").cloned().unwrap_or(Value::Null),
        "shipping_address": body.get("shipping_address").cloned().unwrap_or(Value::Null),
        "created_at": crate::now(),
        "updated_at": null,
    });
    state
        .customers
        .lock()
        .expect("state lock")
        .push(customer.clone());
    (StatusCode::CREATED, Json(customer))
}

async fn delete(State(state): State<CustomerServiceState>, Path(id): Path<i32>) -> Response {
    let mut customers = state.customers.lock().expect("state lock");
    let before = customers.len();
    customers.retain(|c| c["customer_id"] != json!(id));
    if customers.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Customer not found"})),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
