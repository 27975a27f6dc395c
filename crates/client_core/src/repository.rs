use async_trait::async_trait;
use reqwest::Method;
use shared::{
    domain::{Order, OrderId},
    protocol::{OrderPayload, OrderRecord},
};
use tracing::{debug, info};

use crate::{error::ClientError, transport::RestTransport};

/// CRUD access to the order endpoints. Every call is one HTTP request;
/// nothing is cached, coalesced or retried. `delete` does not ask for
/// confirmation, callers must.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Order>, ClientError>;
    /// Server-side filtered to orders awaiting payment.
    async fn list_pending(&self) -> Result<Vec<Order>, ClientError>;
    async fn get_by_id(&self, id: OrderId) -> Result<Order, ClientError>;
    /// Returns the stored order when the backend echoes it back.
    async fn create(&self, payload: &OrderPayload) -> Result<Option<Order>, ClientError>;
    async fn update(
        &self,
        id: OrderId,
        payload: &OrderPayload,
    ) -> Result<Option<Order>, ClientError>;
    async fn delete(&self, id: OrderId) -> Result<(), ClientError>;
}

pub struct HttpOrderRepository {
    transport: RestTransport,
}

impl HttpOrderRepository {
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }

    async fn list(&self, url: &str, context: &'static str) -> Result<Vec<Order>, ClientError> {
        let records: Vec<OrderRecord> = self.transport.get_json(url, context).await?;
        debug!(context, orders = records.len(), "orders fetched");
        Ok(records.into_iter().map(Order::from).collect())
    }
}

#[async_trait]
impl OrderRepository for HttpOrderRepository {
    async fn list_all(&self) -> Result<Vec<Order>, ClientError> {
        self.list(self.transport.endpoints().orders(), "list orders")
            .await
    }

    async fn list_pending(&self) -> Result<Vec<Order>, ClientError> {
        self.list(
            &self.transport.endpoints().pending_orders(),
            "list pending orders",
        )
        .await
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Order, ClientError> {
        let record: OrderRecord = self
            .transport
            .get_json(&self.transport.endpoints().order(id), "fetch order")
            .await?;
        Ok(record.into())
    }

    async fn create(&self, payload: &OrderPayload) -> Result<Option<Order>, ClientError> {
        let stored: Option<OrderRecord> = self
            .transport
            .send_json(
                Method::POST,
                self.transport.endpoints().orders(),
                payload,
                "create order",
            )
            .await?;
        let stored = stored.map(Order::from);
        info!(
            order_id = stored.as_ref().and_then(|o| o.id).map(|id| id.0),
            customer_id = payload.customer_id().0,
            "order created"
        );
        Ok(stored)
    }

    async fn update(
        &self,
        id: OrderId,
        payload: &OrderPayload,
    ) -> Result<Option<Order>, ClientError> {
        let stored: Option<OrderRecord> = self
            .transport
            .send_json(
                Method::PUT,
                &self.transport.endpoints().order(id),
                payload,
                "update order",
            )
            .await?;
        info!(order_id = id.0, "order updated");
        Ok(stored.map(Order::from))
    }

    async fn delete(&self, id: OrderId) -> Result<(), ClientError> {
        self.transport
            .delete(&self.transport.endpoints().order(id), "delete order")
            .await?;
        info!(order_id = id.0, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
