//! Product service client.

use reqwest::multipart::{Form, Part};
use shopdeck_core::{NewProduct, Product, ProductId, ProductUpdate};
use tracing::instrument;

use super::{ApiError, Health, RestClient};

/// Typed client for the product service.
#[derive(Clone)]
pub struct ProductsApi {
    rest: RestClient,
}

impl ProductsApi {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// List products, optionally filtered by a search term the service
    /// matches against name and description.
    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let mut query = Vec::new();
        if let Some(term) = search {
            query.push(("search", term.to_string()));
        }
        self.rest.get_json("/products/", &query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        self.rest.get_json(&format!("/products/{id}"), &[]).await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.rest.post_json("/products/", product).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product, ApiError> {
        self.rest.put_json(&format!("/products/{id}"), update).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        self.rest.delete(&format!("/products/{id}")).await
    }

    /// Upload a product image as multipart form data.
    ///
    /// The service stores the blob and answers with the product, its
    /// `image_url` now pointing at the stored image.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        id: ProductId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Product, ApiError> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);
        self.rest
            .post_multipart(&format!("/products/{id}/upload-image"), form)
            .await
    }

    /// Service health probe.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.rest.get_json("/health", &[]).await
    }
}
