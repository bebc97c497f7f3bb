use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gateway status value that marks a payment as captured. Every other value is a failure.
pub const GATEWAY_SUCCESS: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "FAILED" => Ok(OrderStatus::Failed),
            other => Err(anyhow::anyhow!("Unknown order status: {}", other)),
        }
    }
}

/// Outcome reported by the payment gateway in its callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    Success,
    Failure,
}

impl GatewayOutcome {
    /// Closed mapping: only the exact success token counts, an absent status is a failure.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some(GATEWAY_SUCCESS) => GatewayOutcome::Success,
            _ => GatewayOutcome::Failure,
        }
    }

    pub fn terminal_path(&self) -> &'static str {
        match self {
            GatewayOutcome::Success => "/payment/success",
            GatewayOutcome::Failure => "/payment/failure",
        }
    }
}

impl From<GatewayOutcome> for OrderStatus {
    fn from(outcome: GatewayOutcome) -> Self {
        match outcome {
            GatewayOutcome::Success => OrderStatus::Paid,
            GatewayOutcome::Failure => OrderStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub transaction_id: String,
    pub status: OrderStatus,
    pub return_url: Option<String>,
}

impl Order {
    pub fn pending(transaction_id: impl Into<String>, return_url: Option<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: OrderStatus::Pending,
            return_url,
        }
    }
}

/// The part of a stored order the callback reads. The status column is left
/// undecoded because its initial value is written by the checkout side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLookup {
    pub transaction_id: String,
    pub return_url: Option<String>,
}

/// Form-encoded notification posted by the gateway.
///
/// `status`, `txnid` and `easepayid` drive reconciliation. The remaining
/// fields only take part in the reverse-hash signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackNotification {
    pub status: Option<String>,
    pub txnid: Option<String>,
    pub easepayid: Option<String>,
    pub key: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub udf1: String,
    pub udf2: String,
    pub udf3: String,
    pub udf4: String,
    pub udf5: String,
    pub udf6: String,
    pub udf7: String,
    pub udf8: String,
    pub udf9: String,
    pub udf10: String,
    pub hash: Option<String>,
}

impl CallbackNotification {
    pub fn outcome(&self) -> GatewayOutcome {
        GatewayOutcome::from_status(self.status.as_deref())
    }

    /// Gateway defined fields in reverse order, udf10 down to udf1.
    pub fn udfs_reversed(&self) -> [&str; 10] {
        [
            &self.udf10,
            &self.udf9,
            &self.udf8,
            &self.udf7,
            &self.udf6,
            &self.udf5,
            &self.udf4,
            &self.udf3,
            &self.udf2,
            &self.udf1,
        ]
    }
}

/// Wire shape of the buyer contact block in the external commerce API's checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Wire shape of the request sent to the external commerce API to start a
/// gateway checkout. This service never sends it; the order row it creates is
/// what the callback later updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub product_id: String,
    pub amount: f64,
    #[serde(flatten)]
    pub buyer: BuyerDetails,
    pub success_url: String,
    pub failure_url: String,
}

/// Wire shape of the external commerce API's reply: the transaction id the
/// gateway will echo back as `txnid`, and where to send the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub transaction_id: String,
    pub redirect_url: String,
}
