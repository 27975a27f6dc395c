//! JSON records exchanged with the orders backend.
//!
//! The backend speaks Spanish field names (`idPedido`, `estadoPago`, ...).
//! These records stay close to the wire and convert into the domain types in
//! [`crate::domain`].

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{
    de::{Error as _, IgnoredAny},
    Deserialize, Deserializer, Serialize,
};

use crate::domain::{Customer, CustomerId, Order, OrderId, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "idCliente", deserialize_with = "numeric_id")]
    pub id_cliente: CustomerId,
    #[serde(default)]
    pub nombre: String,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Self {
            id: record.id_cliente,
            name: record.nombre,
        }
    }
}

/// Nested customer reference as it appears in read responses. Older backends
/// embed the whole customer, so unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestedCustomer {
    #[serde(
        rename = "idCliente",
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_cliente: Option<CustomerId>,
}

/// An order as returned by `GET /api/pedidos` and friends.
///
/// The customer reference has moved between backend versions. `clienteId` is
/// canonical; `idCliente`, `id_cliente` and `cliente.idCliente` are accepted
/// in that order of preference. Ids may arrive as numbers or numeric strings;
/// anything else reads as absent instead of failing the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_pedido: Option<OrderId>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub cliente_id: Option<CustomerId>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_cliente: Option<CustomerId>,
    #[serde(
        rename = "id_cliente",
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_cliente_legacy: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<NestedCustomer>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub fecha: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado_pago: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion_envio: Option<String>,
}

impl OrderRecord {
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.cliente_id
            .or(self.id_cliente)
            .or(self.id_cliente_legacy)
            .or_else(|| self.cliente.as_ref().and_then(|c| c.id_cliente))
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let customer_id = record.customer_id();
        Self {
            id: record.id_pedido,
            customer_id,
            date: record.fecha,
            payment_status: record
                .estado_pago
                .unwrap_or_else(|| PaymentStatus::Unknown(String::new())),
            shipping_address: record.direccion_envio.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(rename = "idCliente")]
    pub id_cliente: CustomerId,
}

/// Body of `POST /api/pedidos` and `PUT /api/pedidos/{id}`. The backend
/// expects the customer nested as an object, never a flat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub cliente: CustomerRef,
    pub estado_pago: PaymentStatus,
    pub direccion_envio: String,
    #[serde(with = "iso_millis")]
    pub fecha: DateTime<Utc>,
}

impl OrderPayload {
    pub fn new(
        customer_id: CustomerId,
        estado_pago: PaymentStatus,
        direccion_envio: impl Into<String>,
        fecha: DateTime<Utc>,
    ) -> Self {
        Self {
            cliente: CustomerRef {
                id_cliente: customer_id,
            },
            estado_pago,
            direccion_envio: direccion_envio.into(),
            fecha,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.cliente.id_cliente
    }
}

/// Parses the timestamp shapes the backend has been seen to emit: RFC 3339
/// with an offset, or a naive local date-time treated as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

impl RawId {
    fn value(self) -> Option<i64> {
        match self {
            RawId::Number(value) => Some(value),
            RawId::Text(raw) => raw.trim().parse().ok(),
            RawId::Other(_) => None,
        }
    }
}

fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    let raw: Option<RawId> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(RawId::value).map(T::from))
}

fn numeric_id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    RawId::deserialize(deserializer)?
        .value()
        .map(T::from)
        .ok_or_else(|| D::Error::custom("id is neither a number nor a numeric string"))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

/// Formats a timestamp the way request bodies carry it.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
