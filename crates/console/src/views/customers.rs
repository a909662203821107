//! Customer view: listing, registration, deletion. No cart interaction.

use shopdeck_core::{Customer, CustomerId, NewCustomer};
use tabled::Tabled;

use crate::api::{ApiError, CustomersApi};

#[derive(Tabled)]
struct CustomerRow {
    id: i32,
    email: String,
    name: String,
    phone: String,
    #[tabled(rename = "shipping address")]
    shipping_address: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.customer_id.as_i32(),
            email: customer.email.to_string(),
            name: format!("{} {}", customer.first_name, customer.last_name),
            phone: customer.phone_number.as_deref().unwrap_or("-").to_string(),
            shipping_address: customer
                .shipping_address
                .as_deref()
                .unwrap_or("-")
                .to_string(),
        }
    }
}

/// The customer list view.
pub struct CustomerView {
    api: CustomersApi,
}

impl CustomerView {
    #[must_use]
    pub const fn new(api: CustomersApi) -> Self {
        Self { api }
    }

    /// Fetch the customer list and return the rendered table.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the customer service.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let customers = self.api.list().await?;
        if customers.is_empty() {
            return Ok("(no customers)".to_string());
        }
        let rows: Vec<CustomerRow> = customers.iter().map(CustomerRow::from).collect();
        Ok(super::render_table(&rows))
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the customer service.
    pub async fn create(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        self.api.create(customer).await
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the customer service.
    pub async fn delete(&self, id: CustomerId) -> Result<(), ApiError> {
        self.api.delete(id).await
    }

    /// The underlying client, for health probes.
    #[must_use]
    pub const fn api(&self) -> &CustomersApi {
        &self.api
    }
}
