//! Catalog view: product listing, creation, deletion, image upload.

use moka::future::Cache;
use shopdeck_core::{NewProduct, Product, ProductId, ProductUpdate, format_usd};
use tabled::Tabled;

use crate::api::{ApiError, ProductsApi};

/// Upper bound on cached products.
const CACHE_CAPACITY: u64 = 1000;

/// How much of a long description makes it into the table.
const DESCRIPTION_WIDTH: usize = 40;

#[derive(Tabled)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: String,
    stock: i32,
    image: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.product_id.as_i32(),
            name: product.name.clone(),
            description: product
                .description
                .as_deref()
                .map_or_else(|| "-".to_string(), shorten),
            price: format_usd(product.price),
            stock: product.stock_quantity,
            image: product.image_url.as_deref().unwrap_or("-").to_string(),
        }
    }
}

fn shorten(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_WIDTH {
        return text.to_string();
    }
    let clipped: String = text.chars().take(DESCRIPTION_WIDTH).collect();
    format!("{clipped}…")
}

/// The product list view.
///
/// Maintains a cache of the last-fetched products keyed by id; the cart reads
/// display name and unit price from this cache when a product is added.
pub struct CatalogView {
    api: ProductsApi,
    cache: Cache<ProductId, Product>,
    last_rendered: Option<Vec<Product>>,
}

impl CatalogView {
    #[must_use]
    pub fn new(api: ProductsApi) -> Self {
        Self {
            api,
            cache: Cache::new(CACHE_CAPACITY),
            last_rendered: None,
        }
    }

    /// Fetch the catalog and return the rendered table, refreshing the cache.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn refresh(&mut self, search: Option<&str>) -> Result<String, ApiError> {
        let products = self.api.list(search).await?;
        self.store(&products).await;
        let rendered = render(&products);
        self.last_rendered = Some(products);
        Ok(rendered)
    }

    /// Poll-driven refetch: renders only when the payload changed since the
    /// last render.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn poll(&mut self) -> Result<Option<String>, ApiError> {
        let products = self.api.list(None).await?;
        self.store(&products).await;
        if self.last_rendered.as_ref() == Some(&products) {
            return Ok(None);
        }
        let rendered = render(&products);
        self.last_rendered = Some(products);
        Ok(Some(rendered))
    }

    async fn store(&self, products: &[Product]) {
        for product in products {
            self.cache.insert(product.product_id, product.clone()).await;
        }
    }

    /// Look up a product from the last fetch.
    pub async fn cached(&self, id: ProductId) -> Option<Product> {
        self.cache.get(&id).await
    }

    /// Products as of the last render, for callers that need the raw data.
    #[must_use]
    pub fn snapshot(&self) -> Option<&[Product]> {
        self.last_rendered.as_deref()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.api.create(product).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product, ApiError> {
        self.api.update(id, update).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        self.api.delete(id).await
    }

    /// Upload an image for a product.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the product service.
    pub async fn upload_image(
        &self,
        id: ProductId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Product, ApiError> {
        self.api.upload_image(id, file_name, bytes).await
    }

    /// The underlying client, for health probes.
    #[must_use]
    pub const fn api(&self) -> &ProductsApi {
        &self.api
    }
}

fn render(products: &[Product]) -> String {
    if products.is_empty() {
        return "(no products)".to_string();
    }
    let rows: Vec<ProductRow> = products.iter().map(ProductRow::from).collect();
    super::render_table(&rows)
}
