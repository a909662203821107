//! Order status as reported by the order service.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Orders are created as `pending`; the order service moves them to
/// `confirmed` or `failed` asynchronously once the product service reports
/// the outcome of the stock deduction. The remaining states are set through
/// explicit status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Initial state assigned at creation.
    #[default]
    Pending,
    Processing,
    Shipped,
    /// Stock deduction succeeded.
    Confirmed,
    /// Stock deduction failed.
    Failed,
    Cancelled,
    Completed,
}

impl OrderStatus {
    /// Every status the order service recognizes.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Confirmed,
        Self::Failed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`OrderStatus`] from user input.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown order status `{input}` (expected one of: {expected})")]
pub struct ParseOrderStatusError {
    /// The rejected input.
    pub input: String,
    /// Comma-separated list of accepted values.
    pub expected: String,
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseOrderStatusError {
                input: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipped).expect("serialize failed");
        assert_eq!(json, "\"shipped\"");
        let status: OrderStatus = serde_json::from_str("\"failed\"").expect("deserialize failed");
        assert_eq!(status, OrderStatus::Failed);
    }

    #[test]
    fn parses_every_known_status() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn rejects_unknown_status_with_expected_list() {
        let err = "sideways".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.input, "sideways");
        assert!(err.expected.contains("pending"));
        assert!(err.expected.contains("completed"));
    }
}
