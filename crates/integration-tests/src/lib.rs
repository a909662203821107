//! Integration test support: in-process stubs of the three backend services.
//!
//! The stubs speak just enough of each service's contract to exercise the
//! console client end-to-end: JSON bodies, `{"detail": ...}` error envelopes,
//! `201` creates, `204` deletes, and the multipart image upload. Each stub
//! records the traffic it sees so tests can assert that an operation did (or
//! did not) reach the network.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await;
//! let mut app = ctx.app();
//! ctx.products.seed("Laptop", 999.99, 10);
//! app.handle_line("products").await;
//! app.handle_line("add 1").await;
//! ```

use std::time::Duration;

use url::Url;

use shopdeck_console::app::App;
use shopdeck_console::config::ConsoleConfig;

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::CustomerStub;
pub use orders::OrderStub;
pub use products::ProductStub;

/// Bind a stub router on an ephemeral local port and serve it for the rest of
/// the test process.
pub async fn serve(router: axum::Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server crashed");
    });
    Url::parse(&format!("http://{addr}")).expect("stub base URL")
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// All three stub services plus a matching console configuration.
pub struct TestContext {
    pub config: ConsoleConfig,
    pub products: ProductStub,
    pub customers: CustomerStub,
    pub orders: OrderStub,
}

impl TestContext {
    /// Start the three stubs and build a configuration pointing at them.
    pub async fn start() -> Self {
        let products = ProductStub::spawn().await;
        let customers = CustomerStub::spawn().await;
        let orders = OrderStub::spawn().await;
        let config = ConsoleConfig {
            product_service_url: products.base_url.clone(),
            order_service_url: orders.base_url.clone(),
            customer_service_url: customers.base_url.clone(),
            order_poll: Duration::from_secs(10),
            catalog_poll: Duration::from_secs(15),
        };
        Self {
            config,
            products,
            customers,
            orders,
        }
    }

    /// A console session wired to the stubs, with background polling off so
    /// tests drive every fetch explicitly.
    #[must_use]
    pub fn app(&self) -> App {
        App::new(&self.config, false)
    }
}
