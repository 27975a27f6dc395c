//! Client-side controller for the orders service: customer name resolution,
//! order CRUD, table rendering and the create/edit form.

use chrono::{DateTime, Utc};

pub mod directory;
pub mod error;
pub mod form;
pub mod list;
pub mod notify;
pub mod page;
pub mod render;
pub mod repository;
pub mod transport;

pub use directory::{CustomerApi, CustomerDirectory, HttpCustomerApi, UNKNOWN_CUSTOMER};
pub use error::ClientError;
pub use form::{DateStampPolicy, DeleteOutcome, FormMode, OrderFields, OrderFormController};
pub use list::{ListView, OrderList};
pub use notify::{Confirmer, Notifier};
pub use page::{OrdersPage, PageDependencies};
pub use render::{
    filter_by_status, render_detail, render_orders, BadgeCategory, DateFormatter,
    LocaleDateFormatter, OrderDetail, OrderRow, TableRow,
};
pub use repository::{HttpOrderRepository, OrderRepository};
pub use transport::{RestTransport, ServiceEndpoints};

/// Source of "now" for stamping order dates.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
