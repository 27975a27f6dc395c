//! Customer id → name lookup used to label orders.
//!
//! The backend only embeds a customer id in each order, so the client fetches
//! the full customer list once and resolves names locally. A
//! [`CustomerDirectory`] is an immutable snapshot; reloading produces a new
//! one which the owner swaps in.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::{
    domain::{Customer, CustomerId},
    protocol::CustomerRecord,
};
use tracing::{error, info};

use crate::{error::ClientError, transport::RestTransport};

/// Shown wherever a customer id cannot be resolved.
pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";

#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, ClientError>;
}

pub struct HttpCustomerApi {
    transport: RestTransport,
}

impl HttpCustomerApi {
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CustomerApi for HttpCustomerApi {
    async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        let records: Vec<CustomerRecord> = self
            .transport
            .get_json(self.transport.endpoints().customers(), "list customers")
            .await?;
        Ok(records.into_iter().map(Customer::from).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDirectory {
    names: HashMap<CustomerId, String>,
    loaded: bool,
}

impl CustomerDirectory {
    /// A directory that has never been loaded. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a loaded snapshot. Later duplicates of an id replace earlier
    /// ones.
    pub fn from_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        Self {
            names: customers
                .into_iter()
                .map(|customer| (customer.id, customer.name))
                .collect(),
            loaded: true,
        }
    }

    /// Fetches every customer and builds a fresh snapshot. On failure the
    /// error is logged and returned; the caller keeps whatever snapshot it
    /// already had.
    pub async fn load_all(api: &dyn CustomerApi) -> Result<Self, ClientError> {
        match api.list_customers().await {
            Ok(customers) => {
                let directory = Self::from_customers(customers);
                info!(customers = directory.len(), "customer directory loaded");
                Ok(directory)
            }
            Err(err) => {
                error!(error = %err, "failed to load customer directory");
                Err(err)
            }
        }
    }

    pub fn resolve(&self, id: CustomerId) -> &str {
        self.names
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CUSTOMER)
    }

    pub fn resolve_optional(&self, id: Option<CustomerId>) -> &str {
        id.map_or(UNKNOWN_CUSTOMER, |id| self.resolve(id))
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.names.contains_key(&id)
    }

    /// `false` until a load has succeeded, even if that load returned no
    /// customers.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Snapshot entries ordered by id, for pickers.
    pub fn customers(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .names
            .iter()
            .map(|(id, name)| Customer {
                id: *id,
                name: name.clone(),
            })
            .collect();
        customers.sort_by_key(|customer| customer.id);
        customers
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
