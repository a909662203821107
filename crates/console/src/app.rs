//! Command dispatch and the interactive event loop.
//!
//! Input lines are parsed into [`Command`] values and dispatched to the view
//! components - the console equivalent of delegated DOM events. One
//! `tokio::select!` loop multiplexes stdin with the two background poll
//! timers, so every piece of mutable state (cart, caches, notice slot,
//! pending confirmation) is plainly owned by the loop and mutated from a
//! single task.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use shopdeck_core::{
    CustomerId, Email, EmailError, NewCustomer, NewOrder, NewProduct, OrderId, OrderStatus,
    ParseOrderStatusError, ProductId, ProductUpdate,
};

use crate::api::{self, CustomersApi, OrderFilter, OrdersApi, ProductsApi, RestClient};
use crate::cart::Cart;
use crate::config::ConsoleConfig;
use crate::notify::{Notice, NoticeSlot};
use crate::views::{CatalogView, CustomerView, OrdersView, render_cart};

const HELP: &str = "\
commands:
  products [search]                          list products (refreshes the catalog cache)
  product add <name> <price> <stock> [description]
  product stock <id> <quantity>              set a product's stock level
  product rm <id>                            delete a product (asks to confirm)
  product image <id> <path>                  upload a product image
  customers                                  list customers
  customer add <email> <password> <first> <last> [shipping address]
  customer rm <id>                           delete a customer (asks to confirm)
  add <product-id>                           add one unit to the cart
  cart                                       show the cart
  checkout <customer-id> [shipping address]  place an order from the cart
  orders [status=<status>] [user=<id>]       list orders
  order status <id> <status>                 update an order's status
  order rm <id>                              delete an order (asks to confirm)
  health                                     probe all three services
  help                                       show this text
  quit                                       leave";

/// A parsed console command.
#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Quit,
    Health,
    ShowCart,
    AddToCart {
        product: ProductId,
    },
    Checkout {
        customer: CustomerId,
        shipping_address: Option<String>,
    },
    Products {
        search: Option<String>,
    },
    ProductAdd {
        name: String,
        price: Decimal,
        stock: i32,
        description: Option<String>,
    },
    ProductStock {
        product: ProductId,
        stock: i32,
    },
    ProductRm {
        product: ProductId,
    },
    ProductImage {
        product: ProductId,
        path: PathBuf,
    },
    Customers,
    CustomerAdd {
        email: Email,
        password: SecretString,
        first_name: String,
        last_name: String,
        shipping_address: Option<String>,
    },
    CustomerRm {
        customer: CustomerId,
    },
    Orders {
        filter: OrderFilter,
    },
    OrderStatus {
        order: OrderId,
        status: OrderStatus,
    },
    OrderRm {
        order: OrderId,
    },
    Confirm,
    Cancel,
}

/// Errors produced while parsing a command line.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {what} `{token}`")]
    Invalid { what: &'static str, token: String },
    #[error(transparent)]
    Status(#[from] ParseOrderStatusError),
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the unknown verb, missing
    /// argument, or unparseable value.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["help"] => Ok(Self::Help),
            ["quit" | "exit"] => Ok(Self::Quit),
            ["y" | "yes"] => Ok(Self::Confirm),
            ["n" | "no"] => Ok(Self::Cancel),
            ["health"] => Ok(Self::Health),
            ["cart"] => Ok(Self::ShowCart),

            ["add", id] => Ok(Self::AddToCart {
                product: parse_num(id, "product id")?,
            }),
            ["add", ..] => Err(CommandError::Usage("add <product-id>")),

            ["checkout", id, address @ ..] => Ok(Self::Checkout {
                customer: parse_num(id, "customer id")?,
                shipping_address: join_opt(address),
            }),
            ["checkout"] => Err(CommandError::Usage(
                "checkout <customer-id> [shipping address]",
            )),

            ["products", search @ ..] => Ok(Self::Products {
                search: join_opt(search),
            }),

            ["product", "add", name, price, stock, description @ ..] => Ok(Self::ProductAdd {
                name: (*name).to_string(),
                price: Decimal::from_str(price).map_err(|_| CommandError::Invalid {
                    what: "price",
                    token: (*price).to_string(),
                })?,
                stock: parse_num(stock, "stock quantity")?,
                description: join_opt(description),
            }),
            ["product", "stock", id, stock] => Ok(Self::ProductStock {
                product: parse_num(id, "product id")?,
                stock: parse_num(stock, "stock quantity")?,
            }),
            ["product", "rm", id] => Ok(Self::ProductRm {
                product: parse_num(id, "product id")?,
            }),
            ["product", "image", id, path] => Ok(Self::ProductImage {
                product: parse_num(id, "product id")?,
                path: PathBuf::from(path),
            }),
            ["product", ..] => Err(CommandError::Usage(
                "product add|stock|rm|image ... (see `help`)",
            )),

            ["customers"] => Ok(Self::Customers),
            ["customer", "add", email, password, first, last, address @ ..] => {
                Ok(Self::CustomerAdd {
                    email: Email::parse(email)?,
                    password: SecretString::from(*password),
                    first_name: (*first).to_string(),
                    last_name: (*last).to_string(),
                    shipping_address: join_opt(address),
                })
            }
            ["customer", "rm", id] => Ok(Self::CustomerRm {
                customer: parse_num(id, "customer id")?,
            }),
            ["customer", ..] => Err(CommandError::Usage(
                "customer add|rm ... (see `help`)",
            )),

            ["orders", rest @ ..] => parse_orders(rest),
            ["order", "status", id, status] => Ok(Self::OrderStatus {
                order: parse_num(id, "order id")?,
                status: status.parse()?,
            }),
            ["order", "rm", id] => Ok(Self::OrderRm {
                order: parse_num(id, "order id")?,
            }),
            ["order", ..] => Err(CommandError::Usage(
                "order status|rm ... (see `help`)",
            )),

            [] => Err(CommandError::Unknown(String::new())),
            [other, ..] => Err(CommandError::Unknown((*other).to_string())),
        }
    }
}

fn parse_num<T>(token: &str, what: &'static str) -> Result<T, CommandError>
where
    T: FromStr,
{
    token.parse().map_err(|_| CommandError::Invalid {
        what,
        token: token.to_string(),
    })
}

fn join_opt(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

fn parse_orders(rest: &[&str]) -> Result<Command, CommandError> {
    let mut filter = OrderFilter::default();
    for token in rest {
        match token.split_once('=') {
            Some(("status", value)) => filter.status = Some(value.parse()?),
            Some(("user", value)) => filter.user = Some(parse_num(value, "customer id")?),
            _ => {
                return Err(CommandError::Usage(
                    "orders [status=<status>] [user=<customer-id>]",
                ));
            }
        }
    }
    Ok(Command::Orders { filter })
}

/// A destructive action staged behind an interactive confirmation.
#[derive(Debug, Clone, Copy)]
enum PendingAction {
    DeleteProduct(ProductId),
    DeleteCustomer(CustomerId),
    DeleteOrder(OrderId),
}

impl std::fmt::Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeleteProduct(id) => write!(f, "delete product {id}"),
            Self::DeleteCustomer(id) => write!(f, "delete customer {id}"),
            Self::DeleteOrder(id) => write!(f, "delete order {id}"),
        }
    }
}

/// The interactive storefront session.
pub struct App {
    cart: Cart,
    notices: NoticeSlot,
    catalog: CatalogView,
    customers: CustomerView,
    orders: OrdersView,
    pending: Option<PendingAction>,
    order_poll: Duration,
    catalog_poll: Duration,
    polling: bool,
}

impl App {
    /// Build the session state from configuration.
    #[must_use]
    pub fn new(config: &ConsoleConfig, polling: bool) -> Self {
        let http = api::http_client();
        let catalog = CatalogView::new(ProductsApi::new(RestClient::new(
            http.clone(),
            config.product_service_url.clone(),
        )));
        let customers = CustomerView::new(CustomersApi::new(RestClient::new(
            http.clone(),
            config.customer_service_url.clone(),
        )));
        let orders = OrdersView::new(OrdersApi::new(RestClient::new(
            http,
            config.order_service_url.clone(),
        )));

        Self {
            cart: Cart::new(),
            notices: NoticeSlot::default(),
            catalog,
            customers,
            orders,
            pending: None,
            order_poll: config.order_poll,
            catalog_poll: config.catalog_poll,
            polling,
        }
    }

    /// Initial fetch of every view. Failures are surfaced and the session
    /// starts anyway.
    pub async fn startup(&mut self) {
        self.refresh_catalog(None).await;
        self.refresh_customers().await;
        self.refresh_orders(OrderFilter::default()).await;
    }

    /// Run the interactive loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only when stdin or stdout themselves fail.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.startup().await;
        self.render_notice();

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        let start = tokio::time::Instant::now();
        let mut order_poll = tokio::time::interval_at(start + self.order_poll, self.order_poll);
        let mut catalog_poll =
            tokio::time::interval_at(start + self.catalog_poll, self.catalog_poll);
        order_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        catalog_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.prompt()?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(&line).await {
                        break;
                    }
                    self.render_notice();
                    self.prompt()?;
                }
                _ = order_poll.tick(), if self.polling => self.poll_orders().await,
                _ = catalog_poll.tick(), if self.polling => self.poll_catalog().await,
            }
        }
        Ok(())
    }

    /// Parse and dispatch one input line. Returns `false` when the session
    /// should end.
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }
        match Command::parse(line) {
            Ok(Command::Quit) => return false,
            Ok(command) => self.dispatch(command).await,
            Err(err) => self.notices.error(err.to_string()),
        }
        true
    }

    /// Dispatch a parsed command to its view component.
    pub async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Confirm => {
                self.confirm().await;
                return;
            }
            Command::Cancel => {
                if self.pending.take().is_some() {
                    self.notices.info("cancelled");
                } else {
                    self.notices.info("nothing awaiting confirmation");
                }
                return;
            }
            _ => {
                // Any other command drops a staged deletion.
                if self.pending.take().is_some() {
                    tracing::debug!("pending deletion dropped without confirmation");
                }
            }
        }

        match command {
            Command::Help => println!("{HELP}"),
            Command::Health => self.health().await,
            Command::ShowCart => println!("{}", render_cart(&self.cart)),
            Command::AddToCart { product } => self.add_to_cart(product).await,
            Command::Checkout {
                customer,
                shipping_address,
            } => self.checkout(customer, shipping_address).await,
            Command::Products { search } => self.refresh_catalog(search.as_deref()).await,
            Command::ProductAdd {
                name,
                price,
                stock,
                description,
            } => {
                self.create_product(NewProduct {
                    name,
                    description,
                    price,
                    stock_quantity: stock,
                    image_url: None,
                })
                .await;
            }
            Command::ProductStock { product, stock } => self.set_stock(product, stock).await,
            Command::ProductRm { product } => self.stage(PendingAction::DeleteProduct(product)),
            Command::ProductImage { product, path } => self.upload_image(product, path).await,
            Command::Customers => self.refresh_customers().await,
            Command::CustomerAdd {
                email,
                password,
                first_name,
                last_name,
                shipping_address,
            } => {
                self.create_customer(NewCustomer {
                    email,
                    password,
                    first_name,
                    last_name,
                    phone_number: None,
                    shipping_address,
                })
                .await;
            }
            Command::CustomerRm { customer } => self.stage(PendingAction::DeleteCustomer(customer)),
            Command::Orders { filter } => self.refresh_orders(filter).await,
            Command::OrderStatus { order, status } => self.set_order_status(order, status).await,
            Command::OrderRm { order } => self.stage(PendingAction::DeleteOrder(order)),
            Command::Quit | Command::Confirm | Command::Cancel => {}
        }
    }

    // =========================================================================
    // Cart and checkout
    // =========================================================================

    async fn add_to_cart(&mut self, product: ProductId) {
        match self.catalog.cached(product).await {
            Some(found) => {
                self.cart.add(found.product_id, &found.name, found.price);
                self.notices.success(format!("added {} to cart", found.name));
                println!("{}", render_cart(&self.cart));
            }
            None => self.notices.error(format!(
                "product {product} is not in the last-fetched catalog; run `products` first"
            )),
        }
    }

    async fn checkout(&mut self, customer: CustomerId, shipping_address: Option<String>) {
        if self.cart.is_empty() {
            // Local precondition: no request leaves the process.
            self.notices.info("cart is empty; nothing to order");
            return;
        }

        let order = NewOrder {
            user_id: customer,
            shipping_address,
            items: self.cart.to_order_items(),
        };
        match self.orders.create(&order).await {
            Ok(placed) => {
                self.notices.success(format!(
                    "order #{} accepted with status {}; stock and final status resolve asynchronously",
                    placed.order_id, placed.status
                ));
                self.cart.clear();
                self.refresh_orders(OrderFilter::default()).await;
            }
            Err(err) => {
                // Cart is left untouched so checkout can simply be retried.
                self.notices.error(format!("order was not placed: {err}"));
            }
        }
    }

    // =========================================================================
    // Catalog commands
    // =========================================================================

    async fn refresh_catalog(&mut self, search: Option<&str>) {
        match self.catalog.refresh(search).await {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => self
                .notices
                .error(format!("could not fetch products: {err}")),
        }
    }

    async fn create_product(&mut self, product: NewProduct) {
        match self.catalog.create(&product).await {
            Ok(created) => {
                self.notices
                    .success(format!("created product #{}", created.product_id));
                self.refresh_catalog(None).await;
            }
            Err(err) => self
                .notices
                .error(format!("could not create product: {err}")),
        }
    }

    async fn set_stock(&mut self, product: ProductId, stock: i32) {
        let update = ProductUpdate {
            stock_quantity: Some(stock),
            ..ProductUpdate::default()
        };
        match self.catalog.update(product, &update).await {
            Ok(updated) => {
                self.notices.success(format!(
                    "stock for {} is now {}",
                    updated.name, updated.stock_quantity
                ));
                self.refresh_catalog(None).await;
            }
            Err(err) => self
                .notices
                .error(format!("could not update stock: {err}")),
        }
    }

    async fn upload_image(&mut self, product: ProductId, path: PathBuf) {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                // Local precondition: no request without a readable file.
                self.notices
                    .error(format!("cannot read {}: {err}", path.display()));
                return;
            }
        };
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        match self.catalog.upload_image(product, &file_name, bytes).await {
            Ok(updated) => {
                self.notices
                    .success(format!("image uploaded for {}", updated.name));
                self.refresh_catalog(None).await;
            }
            Err(err) => self.notices.error(format!("upload failed: {err}")),
        }
    }

    // =========================================================================
    // Customer commands
    // =========================================================================

    async fn refresh_customers(&mut self) {
        match self.customers.refresh().await {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => self
                .notices
                .error(format!("could not fetch customers: {err}")),
        }
    }

    async fn create_customer(&mut self, customer: NewCustomer) {
        match self.customers.create(&customer).await {
            Ok(created) => {
                self.notices.success(format!(
                    "registered {} as customer #{}",
                    created.email, created.customer_id
                ));
                self.refresh_customers().await;
            }
            Err(err) => self
                .notices
                .error(format!("could not register customer: {err}")),
        }
    }

    // =========================================================================
    // Order commands
    // =========================================================================

    async fn refresh_orders(&mut self, filter: OrderFilter) {
        match self.orders.refresh(filter).await {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => self.notices.error(format!("could not fetch orders: {err}")),
        }
    }

    async fn set_order_status(&mut self, order: OrderId, status: OrderStatus) {
        match self.orders.set_status(order, status).await {
            Ok(updated) => {
                self.notices.success(format!(
                    "order #{} is now {}",
                    updated.order_id, updated.status
                ));
                self.refresh_orders(OrderFilter::default()).await;
            }
            Err(err) => {
                // Displayed status stays as it was.
                self.notices
                    .error(format!("could not update order: {err}"));
            }
        }
    }

    // =========================================================================
    // Confirmation flow
    // =========================================================================

    fn stage(&mut self, action: PendingAction) {
        self.notices
            .info(format!("about to {action}; type `y` to confirm, `n` to cancel"));
        self.pending = Some(action);
    }

    async fn confirm(&mut self) {
        let Some(action) = self.pending.take() else {
            self.notices.info("nothing awaiting confirmation");
            return;
        };
        match action {
            PendingAction::DeleteProduct(id) => {
                match self.catalog.delete(id).await {
                    Ok(()) => {
                        self.notices.success(format!("product {id} deleted"));
                        self.refresh_catalog(None).await;
                    }
                    Err(err) => self
                        .notices
                        .error(format!("could not delete product {id}: {err}")),
                }
            }
            PendingAction::DeleteCustomer(id) => {
                match self.customers.delete(id).await {
                    Ok(()) => {
                        self.notices.success(format!("customer {id} deleted"));
                        self.refresh_customers().await;
                    }
                    Err(err) => self
                        .notices
                        .error(format!("could not delete customer {id}: {err}")),
                }
            }
            PendingAction::DeleteOrder(id) => {
                match self.orders.delete(id).await {
                    Ok(()) => {
                        self.notices.success(format!("order {id} deleted"));
                        self.refresh_orders(OrderFilter::default()).await;
                    }
                    Err(err) => self
                        .notices
                        .error(format!("could not delete order {id}: {err}")),
                }
            }
        }
    }

    // =========================================================================
    // Health and polling
    // =========================================================================

    async fn health(&mut self) {
        let probes = [
            ("products", self.catalog.api().health().await),
            ("customers", self.customers.api().health().await),
            ("orders", self.orders.api().health().await),
        ];
        for (name, outcome) in probes {
            match outcome {
                Ok(health) => println!("{name}: {} ({})", health.status, health.service),
                Err(err) => println!("{name}: unreachable ({err})"),
            }
        }
    }

    /// Background refetch of the order list.
    pub async fn poll_orders(&mut self) {
        match self.orders.poll().await {
            Ok(Some(rendered)) => {
                println!("\norders changed:\n{rendered}");
            }
            Ok(None) => {}
            // Polls stay quiet on failure; the next tick tries again.
            Err(err) => tracing::debug!(error = %err, "order poll failed"),
        }
    }

    /// Background refetch of the catalog.
    pub async fn poll_catalog(&mut self) {
        match self.catalog.poll().await {
            Ok(Some(rendered)) => {
                println!("\ncatalog changed:\n{rendered}");
            }
            Ok(None) => {}
            Err(err) => tracing::debug!(error = %err, "catalog poll failed"),
        }
    }

    // =========================================================================
    // Rendering helpers and accessors
    // =========================================================================

    fn render_notice(&mut self) {
        if let Some(notice) = self.notices.take() {
            println!("{}", notice.render());
        }
    }

    fn prompt(&self) -> std::io::Result<()> {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        write!(stdout, "shopdeck> ")?;
        stdout.flush()
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    #[must_use]
    pub const fn catalog_view(&self) -> &CatalogView {
        &self.catalog
    }

    #[must_use]
    pub const fn orders_view(&self) -> &OrdersView {
        &self.orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cart_commands() {
        assert!(matches!(
            Command::parse("add 3"),
            Ok(Command::AddToCart { product }) if product == ProductId::new(3)
        ));
        assert!(matches!(Command::parse("cart"), Ok(Command::ShowCart)));
    }

    #[test]
    fn checkout_joins_the_address() {
        let command = Command::parse("checkout 5 1 Main St, Springfield").expect("parse failed");
        match command {
            Command::Checkout {
                customer,
                shipping_address,
            } => {
                assert_eq!(customer, CustomerId::new(5));
                assert_eq!(shipping_address.as_deref(), Some("1 Main St, Springfield"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn order_status_parses_the_status_token() {
        assert!(matches!(
            Command::parse("order status 9 shipped"),
            Ok(Command::OrderStatus { status: OrderStatus::Shipped, .. })
        ));
        assert!(matches!(
            Command::parse("order status 9 sideways"),
            Err(CommandError::Status(_))
        ));
    }

    #[test]
    fn orders_filter_tokens() {
        let command = Command::parse("orders status=failed user=2").expect("parse failed");
        match command {
            Command::Orders { filter } => {
                assert_eq!(filter.status, Some(OrderStatus::Failed));
                assert_eq!(filter.user, Some(CustomerId::new(2)));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(
            Command::parse("orders banana"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn unknown_verbs_are_reported() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown(verb)) if verb == "frobnicate"
        ));
    }

    #[test]
    fn missing_arguments_show_usage() {
        assert!(matches!(
            Command::parse("add"),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            Command::parse("product rm"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn product_add_parses_price_and_stock() {
        let command =
            Command::parse("product add Laptop 999.99 10 A fine machine").expect("parse failed");
        match command {
            Command::ProductAdd {
                name,
                price,
                stock,
                description,
            } => {
                assert_eq!(name, "Laptop");
                assert_eq!(price, Decimal::new(99999, 2));
                assert_eq!(stock, 10);
                assert_eq!(description.as_deref(), Some("A fine machine"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn confirmation_tokens() {
        assert!(matches!(Command::parse("y"), Ok(Command::Confirm)));
        assert!(matches!(Command::parse("yes"), Ok(Command::Confirm)));
        assert!(matches!(Command::parse("n"), Ok(Command::Cancel)));
    }
}
