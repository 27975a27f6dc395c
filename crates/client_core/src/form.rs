//! Create/edit session for a single order.

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{
    domain::{CustomerId, OrderId, PaymentStatus},
    protocol::OrderPayload,
};
use tracing::{error, info, warn};

use crate::{
    error::ClientError,
    list::OrderList,
    notify::{Confirmer, Notifier},
    repository::OrderRepository,
    Clock,
};

pub const CREATED_MESSAGE: &str = "Order created successfully";
pub const UPDATED_MESSAGE: &str = "Order updated successfully";
pub const DELETED_MESSAGE: &str = "Order deleted successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save order";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete order";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load order data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(OrderId),
}

/// Which `fecha` a submitted payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStampPolicy {
    /// Always the submit time, also when editing. This overwrites the
    /// original order date.
    #[default]
    AlwaysNow,
    /// Keep the order's original date on edit; new orders get the submit
    /// time.
    PreserveOnEdit,
}

impl FromStr for DateStampPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "always_now" => Ok(DateStampPolicy::AlwaysNow),
            "preserve_on_edit" => Ok(DateStampPolicy::PreserveOnEdit),
            other => Err(format!(
                "unknown date policy {other:?} (expected always_now or preserve_on_edit)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFields {
    pub customer_id: Option<CustomerId>,
    pub payment_status: Option<PaymentStatus>,
    pub shipping_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

pub struct OrderFormController {
    repository: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    clock: Arc<dyn Clock>,
    policy: DateStampPolicy,
    mode: FormMode,
    fields: OrderFields,
    original_date: Option<DateTime<Utc>>,
    open: bool,
}

impl OrderFormController {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
        clock: Arc<dyn Clock>,
        policy: DateStampPolicy,
    ) -> Self {
        Self {
            repository,
            notifier,
            confirmer,
            clock,
            policy,
            mode: FormMode::Create,
            fields: OrderFields::default(),
            original_date: None,
            open: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &OrderFields {
        &self.fields
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn policy(&self) -> DateStampPolicy {
        self.policy
    }

    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        self.fields.customer_id = customer_id;
    }

    pub fn set_payment_status(&mut self, status: Option<PaymentStatus>) {
        self.fields.payment_status = status;
    }

    pub fn set_shipping_address(&mut self, address: impl Into<String>) {
        self.fields.shipping_address = address.into();
    }

    /// Blank form for a new order.
    pub fn open_create(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Loads `id` into the form. On failure the previous mode and fields are
    /// kept and the error is reported.
    pub async fn open_edit(&mut self, id: OrderId) -> Result<(), ClientError> {
        let order = match self.repository.get_by_id(id).await {
            Ok(order) => order,
            Err(err) => {
                error!(order_id = id.0, error = %err, "failed to load order for editing");
                self.notifier
                    .report_error(&err.user_message(LOAD_FAILED_MESSAGE))
                    .await;
                return Err(err);
            }
        };

        if order.customer_id.is_none() {
            warn!(order_id = id.0, "order carries no customer reference");
        }
        self.mode = FormMode::Edit(id);
        self.fields = OrderFields {
            customer_id: order.customer_id,
            payment_status: Some(order.payment_status),
            shipping_address: order.shipping_address,
        };
        self.original_date = order.date;
        self.open = true;
        Ok(())
    }

    /// Discards the session.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Payload for the current fields, stamped according to the policy.
    pub fn build_payload(&self) -> Result<OrderPayload, ClientError> {
        let customer_id = self
            .fields
            .customer_id
            .ok_or_else(|| ClientError::Validation("A customer must be selected".to_string()))?;
        let status = self
            .fields
            .payment_status
            .clone()
            .ok_or_else(|| ClientError::Validation("A payment status must be selected".to_string()))?;

        let fecha = match (self.policy, self.mode) {
            (DateStampPolicy::PreserveOnEdit, FormMode::Edit(_)) => {
                self.original_date.unwrap_or_else(|| self.clock.now())
            }
            _ => self.clock.now(),
        };

        Ok(OrderPayload::new(
            customer_id,
            status,
            self.fields.shipping_address.trim(),
            fecha,
        ))
    }

    /// Saves the session. Success closes the form, reloads the full order
    /// list and reports; failure keeps the form open and reports. The returned error
    /// has already been shown to the user.
    pub async fn submit(&mut self, list: &mut OrderList) -> Result<(), ClientError> {
        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier
                    .report_error(&err.user_message(SAVE_FAILED_MESSAGE))
                    .await;
                return Err(err);
            }
        };

        let (result, success_message) = match self.mode {
            FormMode::Create => (self.repository.create(&payload).await, CREATED_MESSAGE),
            FormMode::Edit(id) => (
                self.repository.update(id, &payload).await,
                UPDATED_MESSAGE,
            ),
        };

        if let Err(err) = result {
            error!(mode = ?self.mode, error = %err, "failed to save order");
            self.notifier
                .report_error(&err.user_message(SAVE_FAILED_MESSAGE))
                .await;
            return Err(err);
        }

        info!(mode = ?self.mode, "order saved");
        self.reset();
        // Refresh failures are reported by the list itself.
        let _ = list.show_all().await;
        self.notifier.report_success(success_message).await;
        Ok(())
    }

    /// Deletes `id` after the user confirms, then reloads the full order
    /// list. Declining leaves everything untouched and issues no request.
    pub async fn request_delete(
        &mut self,
        id: OrderId,
        list: &mut OrderList,
    ) -> Result<DeleteOutcome, ClientError> {
        let prompt = format!("Are you sure you want to delete order #{id}?");
        if !self.confirmer.confirm(&prompt).await {
            info!(order_id = id.0, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.repository.delete(id).await {
            error!(order_id = id.0, error = %err, "failed to delete order");
            self.notifier.report_error(DELETE_FAILED_MESSAGE).await;
            return Err(err);
        }

        if self.mode == FormMode::Edit(id) {
            self.reset();
        }
        let _ = list.show_all().await;
        self.notifier.report_success(DELETED_MESSAGE).await;
        Ok(DeleteOutcome::Deleted)
    }

    fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.fields = OrderFields::default();
        self.original_date = None;
        self.open = false;
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
