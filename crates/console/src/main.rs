//! Shopdeck - terminal storefront for the product, customer, and order
//! services.
//!
//! # Usage
//!
//! ```bash
//! # Talk to services on the default local ports
//! shopdeck
//!
//! # Point at another environment and slow the background polls
//! shopdeck --order-url http://staging:8001 --order-poll-secs 30
//!
//! # One-off session without background polling
//! shopdeck --no-poll
//! ```
//!
//! Service locations come from `PRODUCT_SERVICE_URL`, `ORDER_SERVICE_URL`,
//! and `CUSTOMER_SERVICE_URL` (see [`shopdeck_console::config`]); flags
//! override the environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use shopdeck_console::app::App;
use shopdeck_console::config::ConsoleConfig;

#[derive(Parser)]
#[command(name = "shopdeck")]
#[command(author, version, about = "Terminal storefront for the Shopdeck services")]
struct Cli {
    /// Product service base URL (overrides PRODUCT_SERVICE_URL)
    #[arg(long)]
    product_url: Option<Url>,

    /// Order service base URL (overrides ORDER_SERVICE_URL)
    #[arg(long)]
    order_url: Option<Url>,

    /// Customer service base URL (overrides CUSTOMER_SERVICE_URL)
    #[arg(long)]
    customer_url: Option<Url>,

    /// Seconds between background order refetches
    #[arg(long)]
    order_poll_secs: Option<u64>,

    /// Seconds between background catalog refetches
    #[arg(long)]
    catalog_poll_secs: Option<u64>,

    /// Disable background polling entirely
    #[arg(long)]
    no_poll: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Session failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(url) = cli.product_url {
        config.product_service_url = url;
    }
    if let Some(url) = cli.order_url {
        config.order_service_url = url;
    }
    if let Some(url) = cli.customer_url {
        config.customer_service_url = url;
    }
    if let Some(secs) = cli.order_poll_secs {
        config.order_poll = Duration::from_secs(secs.max(1));
    }
    if let Some(secs) = cli.catalog_poll_secs {
        config.catalog_poll = Duration::from_secs(secs.max(1));
    }

    let mut app = App::new(&config, !cli.no_poll);
    app.run().await?;
    Ok(())
}
