use serde::{Deserialize, Serialize};

/// Order status as persisted. The provider pushes lowercase strings; we keep
/// the screaming-case vocabulary in the database and on the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    PartiallyPaid,
    Denied,
    Canceled,
    Refund,
    InProcess,
    InAnalysis,
    Expired,
}

impl OrderStatus {
    /// Maps a provider status string to the internal enum. Total over any
    /// input: unknown vocabulary falls back to `Pending` so an unrecognized
    /// push never blocks the pipeline.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "pending" => OrderStatus::Pending,
            "paid" => OrderStatus::Paid,
            "partially_paid" => OrderStatus::PartiallyPaid,
            "denied" => OrderStatus::Denied,
            "canceled" => OrderStatus::Canceled,
            "refund" => OrderStatus::Refund,
            "in_process" => OrderStatus::InProcess,
            "in_analysis" => OrderStatus::InAnalysis,
            "expired" => OrderStatus::Expired,
            _ => OrderStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::PartiallyPaid => "PARTIALLY_PAID",
            OrderStatus::Denied => "DENIED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Refund => "REFUND",
            OrderStatus::InProcess => "IN_PROCESS",
            OrderStatus::InAnalysis => "IN_ANALYSIS",
            OrderStatus::Expired => "EXPIRED",
        }
    }

    /// Parses the persisted representation. `None` for anything that is not
    /// a known column value.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OrderStatus::Pending),
            "PAID" => Some(OrderStatus::Paid),
            "PARTIALLY_PAID" => Some(OrderStatus::PartiallyPaid),
            "DENIED" => Some(OrderStatus::Denied),
            "CANCELED" => Some(OrderStatus::Canceled),
            "REFUND" => Some(OrderStatus::Refund),
            "IN_PROCESS" => Some(OrderStatus::InProcess),
            "IN_ANALYSIS" => Some(OrderStatus::InAnalysis),
            "EXPIRED" => Some(OrderStatus::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_provider_status() {
        let table = [
            ("pending", OrderStatus::Pending),
            ("paid", OrderStatus::Paid),
            ("partially_paid", OrderStatus::PartiallyPaid),
            ("denied", OrderStatus::Denied),
            ("canceled", OrderStatus::Canceled),
            ("refund", OrderStatus::Refund),
            ("in_process", OrderStatus::InProcess),
            ("in_analysis", OrderStatus::InAnalysis),
            ("expired", OrderStatus::Expired),
        ];

        for (raw, expected) in table {
            assert_eq!(OrderStatus::from_provider(raw), expected, "raw = {raw}");
        }
    }

    #[test]
    fn unknown_provider_status_falls_back_to_pending() {
        assert_eq!(OrderStatus::from_provider("chargeback"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_provider(""), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_provider("PAID"), OrderStatus::Pending);
    }

    #[test]
    fn db_representation_round_trips() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::PartiallyPaid,
            OrderStatus::Denied,
            OrderStatus::Canceled,
            OrderStatus::Refund,
            OrderStatus::InProcess,
            OrderStatus::InAnalysis,
            OrderStatus::Expired,
        ];

        for status in all {
            assert_eq!(OrderStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_db("paid"), None);
    }
}
