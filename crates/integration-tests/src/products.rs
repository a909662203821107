//! Stub product service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

/// One received image upload.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub product_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Clone, Default)]
struct ProductServiceState {
    products: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicI32>,
    uploads: Arc<Mutex<Vec<UploadRecord>>>,
}

/// Handle on a running stub product service.
pub struct ProductStub {
    pub base_url: Url,
    state: ProductServiceState,
}

impl ProductStub {
    pub async fn spawn() -> Self {
        let state = ProductServiceState {
            next_id: Arc::new(AtomicI32::new(1)),
            ..ProductServiceState::default()
        };
        let router = Router::new()
            .route("/health", get(health))
            .route("/products/", get(list).post(create))
            .route("/products/{id}", axum::routing::put(update).delete(delete))
            .route("/products/{id}/upload-image", post(upload_image))
            .with_state(state.clone());
        let base_url = crate::serve(router).await;
        Self { base_url, state }
    }

    /// Insert a product directly, returning its id.
    pub fn seed(&self, name: &str, price: f64, stock: i64) -> i32 {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.products.lock().expect("state lock").push(json!({
            "product_id": id,
            "name": name,
            "description": format!("{name} description"),
            "price": price,
            "stock_quantity": stock,
            "image_url": null,
            "created_at": crate::now(),
            "updated_at": null,
        }));
        id
    }

    /// Current service-side product list.
    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        self.state.products.lock().expect("state lock").clone()
    }

    /// Uploads received so far.
    #[must_use]
    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.state.uploads.lock().expect("state lock").clone()
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "product-service"}))
}

async fn list(
    State(state): State<ProductServiceState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let products = state.products.lock().expect("state lock");
    let filtered: Vec<Value> = match params.get("search") {
        Some(term) => {
            let term = term.to_lowercase();
            products
                .iter()
                .filter(|p| {
                    let name = p["name"].as_str().unwrap_or_default().to_lowercase();
                    let description = p["description"].as_str().unwrap_or_default().to_lowercase();
                    name.contains(&term) || description.contains(&term)
                })
                .cloned()
                .collect()
        }
        None => products.clone(),
    };
    Json(Value::Array(filtered))
}

async fn create(
    State(state): State<ProductServiceState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let product = json!({
        "product_id": id,
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "price": body["price"],
        "stock_quantity": body["stock_quantity"],
        "image_url": body.get("image_url").cloned().unwrap_or(Value::Null),
        "created_at": crate::now(),
        "updated_at": null,
    });
    state
        .products
        .lock()
        .expect("state lock")
        .push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn update(
    State(state): State<ProductServiceState>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    let mut products = state.products.lock().expect("state lock");
    let Some(product) = products.iter_mut().find(|p| p["product_id"] == json!(id)) else {
        return not_found();
    };
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            product[key.as_str()] = value.clone();
        }
    }
    product["updated_at"] = json!(crate::now());
    Json(product.clone()).into_response()
}

async fn delete(State(state): State<ProductServiceState>, Path(id): Path<i32>) -> Response {
    let mut products = state.products.lock().expect("state lock");
    let before = products.len();
    products.retain(|p| p["product_id"] != json!(id));
    if products.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_image(
    State(state): State<ProductServiceState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Response {
    let Ok(Some(field)) = multipart.next_field().await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "file field required"})),
        )
            .into_response();
    };
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(ToString::to_string);
    let bytes = field.bytes().await.expect("read upload body");

    state.uploads.lock().expect("state lock").push(UploadRecord {
        product_id: id,
        file_name: file_name.clone(),
        content_type,
        size: bytes.len(),
    });

    let mut products = state.products.lock().expect("state lock");
    let Some(product) = products.iter_mut().find(|p| p["product_id"] == json!(id)) else {
        return not_found();
    };
    product["image_url"] = json!(format!("https://blobs.test/{file_name}"));
    product["updated_at"] = json!(crate::now());
    Json(product.clone()).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Product not found"})),
    )
        .into_response()
}
