//! HTTP plumbing shared by the customer and order endpoints.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::{domain::OrderId, error::ApiErrorBody};
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_CUSTOMERS_PATH: &str = "/api/clientes";
pub const DEFAULT_ORDERS_PATH: &str = "/api/pedidos";

/// Absolute URLs of the two service roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    customers: Url,
    orders: Url,
}

impl ServiceEndpoints {
    pub fn new(customers: Url, orders: Url) -> Self {
        Self { customers, orders }
    }

    /// Appends both paths to `base_url`, e.g. `http://localhost:8080`. Any
    /// path already on the base is kept as a prefix, so `http://host/shop`
    /// with `/api/pedidos` gives `http://host/shop/api/pedidos`.
    pub fn from_base(
        base_url: &str,
        customers_path: &str,
        orders_path: &str,
    ) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        Ok(Self {
            customers: base.join(customers_path.trim_start_matches('/'))?,
            orders: base.join(orders_path.trim_start_matches('/'))?,
        })
    }

    pub fn customers(&self) -> &str {
        self.customers.as_str()
    }

    pub fn orders(&self) -> &str {
        self.orders.as_str()
    }

    pub fn pending_orders(&self) -> String {
        format!("{}/pendientes", self.orders_root())
    }

    pub fn order(&self, id: OrderId) -> String {
        format!("{}/{}", self.orders_root(), id.0)
    }

    fn orders_root(&self) -> &str {
        self.orders.as_str().trim_end_matches('/')
    }
}

#[derive(Clone)]
pub struct RestTransport {
    http: Client,
    endpoints: ServiceEndpoints,
}

impl RestTransport {
    pub fn new(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Network {
                context: "building http client",
                source,
            })?;
        Ok(Self::with_client(http, endpoints))
    }

    pub fn with_client(http: Client, endpoints: ServiceEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    pub(crate) async fn get_json<T>(&self, url: &str, context: &'static str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(self.http.get(url), context).await?;
        decode(&body, context)
    }

    /// Sends `payload` and decodes the response if the server returned one.
    /// A success response with an empty or unreadable body still counts as
    /// success since the write already happened.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        url: &str,
        payload: &B,
        context: &'static str,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.http.request(method, url).json(payload), context)
            .await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(context, error = %err, "ignoring unreadable body on successful write");
                Ok(None)
            }
        }
    }

    pub(crate) async fn delete(&self, url: &str, context: &'static str) -> Result<(), ClientError> {
        self.execute(self.http.delete(url), context).await?;
        Ok(())
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<Vec<u8>, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Network { context, source })?;
        let status = response.status();
        debug!(context, url = %response.url(), status = status.as_u16(), "orders service responded");

        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|source| ClientError::Network { context, source })?;
            return Ok(bytes.to_vec());
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ApiErrorBody>(&body)
            .ok()
            .and_then(|body| body.user_message().map(str::to_string));
        warn!(
            context,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "orders service returned an error"
        );
        Err(ClientError::Api {
            context,
            status: status.as_u16(),
            message,
        })
    }
}

fn decode<T>(body: &[u8], context: &'static str) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|source| ClientError::Parse { context, source })
}
