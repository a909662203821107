//! Customer service client.

use shopdeck_core::{Customer, CustomerId, NewCustomer};
use tracing::instrument;

use super::{ApiError, Health, RestClient};

/// Typed client for the customer service.
#[derive(Clone)]
pub struct CustomersApi {
    rest: RestClient,
}

impl CustomersApi {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, ApiError> {
        self.rest.get_json("/customers/", &[]).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Customer, ApiError> {
        self.rest.get_json(&format!("/customers/{id}"), &[]).await
    }

    /// Register a customer. The password travels only in this request body.
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    pub async fn create(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        self.rest.post_json("/customers/", customer).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), ApiError> {
        self.rest.delete(&format!("/customers/{id}")).await
    }

    /// Service health probe.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.rest.get_json("/health", &[]).await
    }
}
