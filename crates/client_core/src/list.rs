//! The displayed order table and the load → render cycle behind it.

use std::sync::Arc;

use shared::domain::{Order, PaymentStatus};
use tracing::{debug, error, info};

use crate::{
    directory::{CustomerApi, CustomerDirectory},
    error::ClientError,
    notify::Notifier,
    render::{filter_by_status, render_orders, DateFormatter, TableRow},
    repository::OrderRepository,
};

pub const LIST_FAILED_MESSAGE: &str = "Could not load orders";
pub const PENDING_FAILED_MESSAGE: &str = "Could not load pending orders";
pub const FILTER_FAILED_MESSAGE: &str = "Could not filter orders";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListView {
    #[default]
    All,
    /// Filtered by the server.
    Pending,
    /// Full list filtered locally.
    Status(PaymentStatus),
}

pub struct OrderList {
    repository: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerApi>,
    notifier: Arc<dyn Notifier>,
    formatter: Arc<dyn DateFormatter>,
    directory: CustomerDirectory,
    view: ListView,
    orders: Vec<Order>,
    rows: Vec<TableRow>,
}

impl OrderList {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerApi>,
        notifier: Arc<dyn Notifier>,
        formatter: Arc<dyn DateFormatter>,
    ) -> Self {
        Self {
            repository,
            customers,
            notifier,
            formatter,
            directory: CustomerDirectory::empty(),
            view: ListView::All,
            orders: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn directory(&self) -> &CustomerDirectory {
        &self.directory
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Rows from the last successful load. Empty until something loaded.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Replaces the directory snapshot. On failure the current snapshot is
    /// kept and the error returned; nothing is reported to the user here.
    pub async fn load_directory(&mut self) -> Result<(), ClientError> {
        let directory = CustomerDirectory::load_all(self.customers.as_ref()).await?;
        self.directory = directory;
        if !self.orders.is_empty() {
            self.rerender();
        }
        Ok(())
    }

    /// Re-fetches the current view and re-renders. On failure the previous
    /// rows stay and the error is reported once.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let view = self.view.clone();
        debug!(view = ?view, "refreshing order list");
        let (result, failure_message) = match &view {
            ListView::All => (self.repository.list_all().await, LIST_FAILED_MESSAGE),
            ListView::Pending => (
                self.repository.list_pending().await,
                PENDING_FAILED_MESSAGE,
            ),
            ListView::Status(status) => (
                self.repository
                    .list_all()
                    .await
                    .map(|orders| filter_by_status(&orders, status)),
                FILTER_FAILED_MESSAGE,
            ),
        };

        match result {
            Ok(orders) => {
                info!(view = ?view, orders = orders.len(), "order list loaded");
                self.orders = orders;
                self.rerender();
                Ok(())
            }
            Err(err) => {
                error!(view = ?view, error = %err, "failed to load order list");
                self.notifier.report_error(failure_message).await;
                Err(err)
            }
        }
    }

    /// Changes the view without loading; the next `refresh` uses it.
    pub fn set_view(&mut self, view: ListView) {
        self.view = view;
    }

    pub async fn show_all(&mut self) -> Result<(), ClientError> {
        self.view = ListView::All;
        self.refresh().await
    }

    pub async fn show_pending(&mut self) -> Result<(), ClientError> {
        self.view = ListView::Pending;
        self.refresh().await
    }

    pub async fn show_status(&mut self, status: PaymentStatus) -> Result<(), ClientError> {
        self.view = ListView::Status(status);
        self.refresh().await
    }

    fn rerender(&mut self) {
        self.rows = render_orders(&self.orders, &self.directory, self.formatter.as_ref());
    }

    pub(crate) fn formatter(&self) -> &dyn DateFormatter {
        self.formatter.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
