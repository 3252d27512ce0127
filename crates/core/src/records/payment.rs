//! Payment records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MemberId, PaymentId, PaymentStatus};

/// A dues or fee payment made by one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub member_id: MemberId,
    /// Non-negative amount in the association's currency.
    pub amount: Decimal,
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Whether the payment counts towards revenue.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// Insert payload for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPayment {
    pub member_id: MemberId,
    pub amount: Decimal,
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a payment. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Revenue over all completed payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentsSummary {
    pub total_revenue: Decimal,
    pub completed_count: usize,
}

impl PaymentsSummary {
    /// Sum the completed payments among `amounts`.
    #[must_use]
    pub fn from_completed<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        amounts
            .into_iter()
            .fold(Self::default(), |acc, amount| Self {
                total_revenue: acc.total_revenue + amount,
                completed_count: acc.completed_count + 1,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_accepts_json_number() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "member_id": "00000000-0000-0000-0000-000000000002",
            "amount": 1250.5,
            "payment_type": "Maintenance",
            "payment_method": "UPI",
            "status": "Completed",
            "due_date": "2026-01-31",
            "paid_date": null,
            "description": null,
            "notes": null,
            "created_at": "2026-01-02T00:00:00+00:00",
            "updated_at": "2026-01-02T00:00:00+00:00"
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.amount, Decimal::new(12505, 1));
        assert!(payment.is_completed());
    }

    #[test]
    fn test_summary_sums_amounts() {
        let summary =
            PaymentsSummary::from_completed([Decimal::new(1000, 2), Decimal::new(2550, 2)]);
        assert_eq!(summary.total_revenue, Decimal::new(3550, 2));
        assert_eq!(summary.completed_count, 2);
    }

    #[test]
    fn test_summary_of_nothing_is_zero() {
        let summary = PaymentsSummary::from_completed(std::iter::empty());
        assert_eq!(summary, PaymentsSummary::default());
    }
}
