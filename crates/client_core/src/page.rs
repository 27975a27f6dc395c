//! One orders screen: startup ordering, list, form and detail view wired
//! together.

use std::sync::Arc;

use shared::domain::OrderId;
use tracing::{error, info, warn};

use crate::{
    directory::CustomerApi,
    error::ClientError,
    form::{DateStampPolicy, DeleteOutcome, OrderFormController},
    list::OrderList,
    notify::{Confirmer, Notifier},
    render::{render_detail, DateFormatter, OrderDetail},
    repository::OrderRepository,
    Clock,
};

pub const DIRECTORY_FAILED_MESSAGE: &str = "Could not load customers; names will show as unknown";
pub const DETAIL_FAILED_MESSAGE: &str = "Could not load order details";

pub struct PageDependencies {
    pub customers: Arc<dyn CustomerApi>,
    pub orders: Arc<dyn OrderRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub confirmer: Arc<dyn Confirmer>,
    pub clock: Arc<dyn Clock>,
    pub formatter: Arc<dyn DateFormatter>,
    pub date_policy: DateStampPolicy,
}

pub struct OrdersPage {
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
    list: OrderList,
    form: OrderFormController,
}

impl OrdersPage {
    pub fn new(deps: PageDependencies) -> Self {
        let list = OrderList::new(
            Arc::clone(&deps.orders),
            deps.customers,
            Arc::clone(&deps.notifier),
            deps.formatter,
        );
        let form = OrderFormController::new(
            Arc::clone(&deps.orders),
            Arc::clone(&deps.notifier),
            deps.confirmer,
            deps.clock,
            deps.date_policy,
        );
        Self {
            orders: deps.orders,
            notifier: deps.notifier,
            list,
            form,
        }
    }

    pub fn list(&self) -> &OrderList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut OrderList {
        &mut self.list
    }

    pub fn form(&self) -> &OrderFormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut OrderFormController {
        &mut self.form
    }

    /// Loads the customer directory and only then the order list, so the
    /// first render can resolve names. A directory failure degrades to the
    /// unknown-customer sentinel instead of skipping the list.
    ///
    /// The list loads whatever view is current, `ListView::All` unless the
    /// caller picked another one with [`OrderList::set_view`].
    pub async fn startup(&mut self) -> Result<(), ClientError> {
        self.load_directory().await;
        self.list.refresh().await?;
        info!(rows = self.list.rows().len(), "orders page ready");
        Ok(())
    }

    /// Loads the customer directory, reporting a failure once. Returns
    /// whether a fresh snapshot is in place.
    pub async fn load_directory(&mut self) -> bool {
        match self.list.load_directory().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "continuing without customer names");
                self.notifier.report_error(DIRECTORY_FAILED_MESSAGE).await;
                false
            }
        }
    }

    pub async fn submit_form(&mut self) -> Result<(), ClientError> {
        self.form.submit(&mut self.list).await
    }

    pub async fn request_delete(&mut self, id: OrderId) -> Result<DeleteOutcome, ClientError> {
        self.form.request_delete(id, &mut self.list).await
    }

    pub async fn show_detail(&self, id: OrderId) -> Result<OrderDetail, ClientError> {
        match self.orders.get_by_id(id).await {
            Ok(order) => Ok(render_detail(
                &order,
                self.list.directory(),
                self.list.formatter(),
            )),
            Err(err) => {
                error!(order_id = id.0, error = %err, "failed to load order details");
                self.notifier.report_error(DETAIL_FAILED_MESSAGE).await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
