//! Pure transformation from orders to display rows.
//!
//! Nothing here touches the network. A front end takes the [`TableRow`]s and
//! draws them however it likes.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset as _, Utc};
use shared::domain::{Order, OrderId, PaymentStatus};

use crate::directory::CustomerDirectory;

/// id, customer, date, status, address, actions
pub const COLUMN_COUNT: usize = 6;
pub const EMPTY_TABLE_TEXT: &str = "No orders registered";
pub const MISSING_VALUE: &str = "-";

/// Locale-aware date rendering, supplied by the front end.
pub trait DateFormatter: Send + Sync {
    fn format(&self, value: &DateTime<Utc>) -> String;
}

/// `dd/mm/yyyy, HH:MM:SS` in a fixed offset. Defaults to UTC-3, the
/// deployment's local time.
#[derive(Debug, Clone, Copy)]
pub struct LocaleDateFormatter {
    offset: FixedOffset,
}

impl LocaleDateFormatter {
    pub const DEFAULT_OFFSET_MINUTES: i32 = -180;

    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is out of range (more than a day).
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }
}

impl Default for LocaleDateFormatter {
    fn default() -> Self {
        Self::from_offset_minutes(Self::DEFAULT_OFFSET_MINUTES)
            .unwrap_or_else(|| Self::new(Utc.fix()))
    }
}

impl DateFormatter for LocaleDateFormatter {
    fn format(&self, value: &DateTime<Utc>) -> String {
        value
            .with_timezone(&self.offset)
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    Warning,
    Success,
    Danger,
    Secondary,
}

impl BadgeCategory {
    pub fn for_status(status: &PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => BadgeCategory::Warning,
            PaymentStatus::Paid => BadgeCategory::Success,
            PaymentStatus::Cancelled => BadgeCategory::Danger,
            PaymentStatus::Unknown(_) => BadgeCategory::Secondary,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BadgeCategory::Warning => "bg-warning",
            BadgeCategory::Success => "bg-success",
            BadgeCategory::Danger => "bg-danger",
            BadgeCategory::Secondary => "bg-secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub order_id: Option<OrderId>,
    pub customer_name: String,
    pub date: String,
    pub status_label: String,
    pub badge: BadgeCategory,
    pub shipping_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Order(OrderRow),
    Placeholder { text: String, colspan: usize },
}

impl TableRow {
    pub fn as_order(&self) -> Option<&OrderRow> {
        match self {
            TableRow::Order(row) => Some(row),
            TableRow::Placeholder { .. } => None,
        }
    }
}

/// One row per order in input order; a single placeholder row when there
/// are no orders.
pub fn render_orders(
    orders: &[Order],
    directory: &CustomerDirectory,
    formatter: &dyn DateFormatter,
) -> Vec<TableRow> {
    if orders.is_empty() {
        return vec![TableRow::Placeholder {
            text: EMPTY_TABLE_TEXT.to_string(),
            colspan: COLUMN_COUNT,
        }];
    }

    orders
        .iter()
        .map(|order| TableRow::Order(render_row(order, directory, formatter)))
        .collect()
}

fn render_row(order: &Order, directory: &CustomerDirectory, formatter: &dyn DateFormatter) -> OrderRow {
    OrderRow {
        order_id: order.id,
        customer_name: directory.resolve_optional(order.customer_id).to_string(),
        date: format_date(order.date.as_ref(), formatter),
        status_label: status_label(&order.payment_status),
        badge: BadgeCategory::for_status(&order.payment_status),
        shipping_address: order.shipping_address.clone(),
    }
}

fn format_date(date: Option<&DateTime<Utc>>, formatter: &dyn DateFormatter) -> String {
    date.map_or_else(|| MISSING_VALUE.to_string(), |date| formatter.format(date))
}

fn status_label(status: &PaymentStatus) -> String {
    match status.as_wire() {
        "" => MISSING_VALUE.to_string(),
        label => label.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order_id: Option<OrderId>,
    pub customer_name: String,
    pub date: String,
    pub status_label: String,
    pub shipping_address: String,
}

impl fmt::Display for OrderDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_id {
            Some(id) => writeln!(f, "Order #{id}")?,
            None => writeln!(f, "Order (unsaved)")?,
        }
        writeln!(f)?;
        writeln!(f, "Customer: {}", self.customer_name)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Status: {}", self.status_label)?;
        write!(f, "Address: {}", self.shipping_address)
    }
}

pub fn render_detail(
    order: &Order,
    directory: &CustomerDirectory,
    formatter: &dyn DateFormatter,
) -> OrderDetail {
    OrderDetail {
        order_id: order.id,
        customer_name: directory.resolve_optional(order.customer_id).to_string(),
        date: format_date(order.date.as_ref(), formatter),
        status_label: status_label(&order.payment_status),
        shipping_address: order.shipping_address.clone(),
    }
}

/// Orders whose status equals `status`, keeping their relative order.
pub fn filter_by_status(orders: &[Order], status: &PaymentStatus) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| &order.payment_status == status)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
