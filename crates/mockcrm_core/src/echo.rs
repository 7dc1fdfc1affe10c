//! Webhook echo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement returned for a delivered webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEcho {
    /// Always true.
    pub received: bool,
    /// When the delivery was received.
    pub timestamp: DateTime<Utc>,
    /// The delivered body, unchanged. `null` when the body was empty.
    pub payload: Value,
}

/// Echoes a webhook delivery back to the sender.
///
/// Stateless and total: the payload shape is not inspected.
pub fn echo(payload: Option<Value>, now: DateTime<Utc>) -> WebhookEcho {
    WebhookEcho {
        received: true,
        timestamp: now,
        payload: payload.unwrap_or(Value::Null),
    }
}
