use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WireError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                $name(raw)
            }
        }

        impl FromStr for $name {
            type Err = WireError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.trim()
                    .parse::<i64>()
                    .map($name)
                    .map_err(|_| WireError::InvalidId(raw.to_string()))
            }
        }
    };
}

id_newtype!(CustomerId);
id_newtype!(OrderId);

/// Payment state of an order as reported by the backend.
///
/// Values the client does not recognise are kept verbatim in `Unknown` so a
/// newer backend never breaks listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Unknown(String),
}

impl PaymentStatus {
    pub const KNOWN: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Cancelled,
    ];

    pub fn as_wire(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDIENTE",
            PaymentStatus::Paid => "PAGADO",
            PaymentStatus::Cancelled => "CANCELADO",
            PaymentStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PaymentStatus::Unknown(_))
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDIENTE" => PaymentStatus::Pending,
            "PAGADO" => PaymentStatus::Paid,
            "CANCELADO" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Unknown(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unknown(raw) => raw,
            known => known.as_wire().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Accepts the wire spelling or the English name, case-insensitively.
/// Unrecognised input is rejected rather than mapped to `Unknown`, since
/// this is used for user input.
impl FromStr for PaymentStatus {
    type Err = WireError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pendiente" | "pending" => Ok(PaymentStatus::Pending),
            "pagado" | "paid" => Ok(PaymentStatus::Paid),
            "cancelado" | "cancelled" | "canceled" => Ok(PaymentStatus::Cancelled),
            _ => Err(WireError::InvalidStatus(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

/// An order as seen by the client. `id` is `None` until the backend
/// persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Option<OrderId>,
    pub customer_id: Option<CustomerId>,
    pub date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub shipping_address: String,
}
