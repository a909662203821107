//! Client-level contract checks: error-detail extraction, the 204 rule, and
//! transport failures, exercised against purpose-built routes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;

use shopdeck_console::api::{ApiError, ProductsApi, RestClient, http_client};
use shopdeck_core::{NewProduct, ProductId};
use shopdeck_integration_tests::{TestContext, serve};

#[tokio::test]
async fn test_health_probes_identify_each_service() {
    let ctx = TestContext::start().await;
    let api = ProductsApi::new(RestClient::new(http_client(), ctx.products.base_url.clone()));

    let health = api.health().await.expect("health probe");
    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "product-service");
}

#[tokio::test]
async fn test_delete_treats_anything_but_204_as_failure() {
    // A misbehaving endpoint that answers deletes with 200 and a body.
    let router = Router::new().route(
        "/products/{id}",
        delete(|| async { (StatusCode::OK, Json(json!({"deleted": true}))).into_response() }),
    );
    let base_url = serve(router).await;
    let api = ProductsApi::new(RestClient::new(http_client(), base_url));

    let err = api.delete(ProductId::new(1)).await.unwrap_err();
    match err {
        ApiError::Service { status, .. } => assert_eq!(status, StatusCode::OK),
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_string_detail_is_surfaced_verbatim() {
    let router = Router::new().route(
        "/products/",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "detail": "Product with this name might already exist or similar data integrity issue."
                })),
            )
                .into_response()
        }),
    );
    let base_url = serve(router).await;
    let api = ProductsApi::new(RestClient::new(http_client(), base_url));

    let err = api
        .create(&NewProduct {
            name: "Laptop".to_string(),
            description: None,
            price: Decimal::from(10),
            stock_quantity: 1,
            image_url: None,
        })
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("might already exist"),
        "unexpected message: {err}"
    );
}

#[tokio::test]
async fn test_bodyless_errors_fall_back_to_the_http_status() {
    let router = Router::new().route(
        "/products/",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
    );
    let base_url = serve(router).await;
    let api = ProductsApi::new(RestClient::new(http_client(), base_url));

    let err = api
        .create(&NewProduct {
            name: "Laptop".to_string(),
            description: None,
            price: Decimal::from(10),
            stock_quantity: 1,
            image_url: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500 Internal Server Error");
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    // Bind and immediately drop a listener so the port is very likely free.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);

    let base_url = url::Url::parse(&format!("http://{addr}")).expect("url");
    let api = ProductsApi::new(RestClient::new(http_client(), base_url));

    let err = api.list(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
