//! In-memory fakes and an axum mock of the orders service shared by the
//! unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use shared::{
    domain::{Customer, CustomerId, Order, OrderId, PaymentStatus},
    protocol::OrderPayload,
};
use tokio::net::TcpListener;

use crate::{
    directory::CustomerApi,
    error::ClientError,
    form::DateStampPolicy,
    list::OrderList,
    notify::{Confirmer, Notifier},
    page::{OrdersPage, PageDependencies},
    render::DateFormatter,
    repository::OrderRepository,
    transport::{RestTransport, ServiceEndpoints, DEFAULT_CUSTOMERS_PATH, DEFAULT_ORDERS_PATH},
    Clock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListCustomers,
    ListAll,
    ListPending,
    GetById,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCustomers,
    ListAll,
    ListPending,
    GetById(OrderId),
    Create(OrderPayload),
    Update(OrderId, OrderPayload),
    Delete(OrderId),
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::ListCustomers => Op::ListCustomers,
            Call::ListAll => Op::ListAll,
            Call::ListPending => Op::ListPending,
            Call::GetById(_) => Op::GetById,
            Call::Create(_) => Op::Create,
            Call::Update(_, _) => Op::Update,
            Call::Delete(_) => Op::Delete,
        }
    }
}

/// Backend double implementing both network seams over one call log, so
/// tests can assert cross-component ordering.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    customers: Mutex<Vec<Customer>>,
    orders: Mutex<Vec<Order>>,
    failures: Mutex<HashMap<Op, Option<String>>>,
}

impl FakeBackend {
    pub fn new(customers: Vec<Customer>, orders: Vec<Order>) -> Arc<Self> {
        Arc::new(Self {
            customers: Mutex::new(customers),
            orders: Mutex::new(orders),
            ..Self::default()
        })
    }

    pub fn fail(&self, op: Op, message: Option<&str>) {
        self.failures
            .lock()
            .expect("failures lock")
            .insert(op, message.map(str::to_string));
    }

    pub fn recover(&self, op: Op) {
        self.failures.lock().expect("failures lock").remove(&op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|call| call.op() == op).count()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().expect("orders lock").clone()
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock().expect("orders lock") = orders;
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        let op = call.op();
        self.calls.lock().expect("calls lock").push(call);
        match self.failures.lock().expect("failures lock").get(&op) {
            Some(message) => Err(ClientError::Api {
                context: "fake backend",
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn stored(payload: &OrderPayload, id: OrderId) -> Order {
        Order {
            id: Some(id),
            customer_id: Some(payload.customer_id()),
            date: Some(payload.fecha),
            payment_status: payload.estado_pago.clone(),
            shipping_address: payload.direccion_envio.clone(),
        }
    }
}

#[async_trait]
impl CustomerApi for FakeBackend {
    async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.record(Call::ListCustomers)?;
        Ok(self.customers.lock().expect("customers lock").clone())
    }
}

#[async_trait]
impl OrderRepository for FakeBackend {
    async fn list_all(&self) -> Result<Vec<Order>, ClientError> {
        self.record(Call::ListAll)?;
        Ok(self.orders())
    }

    async fn list_pending(&self) -> Result<Vec<Order>, ClientError> {
        self.record(Call::ListPending)?;
        Ok(self
            .orders()
            .into_iter()
            .filter(|order| order.payment_status == PaymentStatus::Pending)
            .collect())
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Order, ClientError> {
        self.record(Call::GetById(id))?;
        self.orders()
            .into_iter()
            .find(|order| order.id == Some(id))
            .ok_or(ClientError::Api {
                context: "fake backend",
                status: 404,
                message: Some("Order not found".to_string()),
            })
    }

    async fn create(&self, payload: &OrderPayload) -> Result<Option<Order>, ClientError> {
        self.record(Call::Create(payload.clone()))?;
        let mut orders = self.orders.lock().expect("orders lock");
        let next = orders
            .iter()
            .filter_map(|order| order.id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            + 1;
        let order = Self::stored(payload, OrderId(next));
        orders.push(order.clone());
        Ok(Some(order))
    }

    async fn update(
        &self,
        id: OrderId,
        payload: &OrderPayload,
    ) -> Result<Option<Order>, ClientError> {
        self.record(Call::Update(id, payload.clone()))?;
        let mut orders = self.orders.lock().expect("orders lock");
        let order = Self::stored(payload, id);
        if let Some(existing) = orders.iter_mut().find(|order| order.id == Some(id)) {
            *existing = order.clone();
        }
        Ok(Some(order))
    }

    async fn delete(&self, id: OrderId) -> Result<(), ClientError> {
        self.record(Call::Delete(id))?;
        self.orders
            .lock()
            .expect("orders lock")
            .retain(|order| order.id != Some(id));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|notice| match notice {
                Notice::Error(message) => Some(message),
                Notice::Success(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn report_error(&self, message: &str) {
        self.notices
            .lock()
            .expect("notices lock")
            .push(Notice::Error(message.to_string()));
    }

    async fn report_success(&self, message: &str) {
        self.notices
            .lock()
            .expect("notices lock")
            .push(Notice::Success(message.to_string()));
    }
}

pub struct ScriptedConfirmer {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.answer
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct IsoFormatter;

impl DateFormatter for IsoFormatter {
    fn format(&self, value: &DateTime<Utc>) -> String {
        value.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn customer(id: i64, name: &str) -> Customer {
    Customer {
        id: CustomerId(id),
        name: name.to_string(),
    }
}

pub fn order(id: i64, customer_id: i64, status: PaymentStatus, address: &str) -> Order {
    Order {
        id: Some(OrderId(id)),
        customer_id: Some(CustomerId(customer_id)),
        date: Some(at(2024, 5, 1, 13)),
        payment_status: status,
        shipping_address: address.to_string(),
    }
}

pub fn order_list(backend: &Arc<FakeBackend>, notifier: &Arc<RecordingNotifier>) -> OrderList {
    OrderList::new(
        backend.clone(),
        backend.clone(),
        notifier.clone(),
        Arc::new(IsoFormatter),
    )
}

pub struct PageHarness {
    pub backend: Arc<FakeBackend>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirmer: Arc<ScriptedConfirmer>,
    pub page: OrdersPage,
}

pub fn page_harness(
    backend: Arc<FakeBackend>,
    confirm: bool,
    now: DateTime<Utc>,
    date_policy: DateStampPolicy,
) -> PageHarness {
    let notifier = RecordingNotifier::new();
    let confirmer = ScriptedConfirmer::answering(confirm);
    let page = OrdersPage::new(PageDependencies {
        customers: backend.clone(),
        orders: backend.clone(),
        notifier: notifier.clone(),
        confirmer: confirmer.clone(),
        clock: Arc::new(FixedClock(now)),
        formatter: Arc::new(IsoFormatter),
        date_policy,
    });
    PageHarness {
        backend,
        notifier,
        confirmer,
        page,
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<tokio::sync::Mutex<Vec<RecordedRequest>>>,
    responses: Arc<HashMap<(Method, String), (StatusCode, String)>>,
}

/// Canned-response HTTP server standing in for the orders service.
#[derive(Default)]
pub struct MockService {
    responses: HashMap<(Method, String), (StatusCode, String)>,
}

pub struct RunningMockService {
    pub base_url: String,
    requests: Arc<tokio::sync::Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        mut self,
        method: Method,
        path: &str,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Self {
        self.responses
            .insert((method, path.to_string()), (status, body.into()));
        self
    }

    pub async fn spawn(self) -> RunningMockService {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let state = MockState {
            requests: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            responses: Arc::new(self.responses),
        };
        let requests = Arc::clone(&state.requests);
        let app = Router::new().fallback(handle_mock).with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        RunningMockService {
            base_url: format!("http://{addr}"),
            requests,
        }
    }
}

impl RunningMockService {
    pub fn transport(&self) -> RestTransport {
        transport_for(&self.base_url)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

pub fn transport_for(base_url: &str) -> RestTransport {
    let endpoints = ServiceEndpoints::from_base(base_url, DEFAULT_CUSTOMERS_PATH, DEFAULT_ORDERS_PATH)
        .expect("endpoints");
    RestTransport::new(endpoints, Duration::from_secs(5)).expect("transport")
}

async fn handle_mock(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let path = uri.path().to_string();
    state.requests.lock().await.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
    });
    let (status, body) = state
        .responses
        .get(&(method, path))
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
