//! Dashboard aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::MemberStatus;

use super::PaymentsSummary;

/// Member counts and completed-payment revenue shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_members: usize,
    pub active_count: usize,
    pub inactive_count: usize,
    pub id_created_count: usize,
    pub total_revenue: Decimal,
    pub completed_payments_count: usize,
}

impl DashboardStats {
    /// Build stats from `(status, id_card_created)` pairs and a revenue summary.
    #[must_use]
    pub fn from_rows<I>(members: I, payments: PaymentsSummary) -> Self
    where
        I: IntoIterator<Item = (MemberStatus, bool)>,
    {
        let mut stats = Self {
            total_revenue: payments.total_revenue,
            completed_payments_count: payments.completed_count,
            ..Self::default()
        };

        for (status, id_card_created) in members {
            stats.total_members += 1;
            match status {
                MemberStatus::Active => stats.active_count += 1,
                MemberStatus::Inactive => stats.inactive_count += 1,
            }
            if id_card_created {
                stats.id_created_count += 1;
            }
        }

        stats
    }

    /// Members still waiting for an ID card.
    #[must_use]
    pub const fn id_pending_count(&self) -> usize {
        self.total_members.saturating_sub(self.id_created_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_status_and_card() {
        let stats = DashboardStats::from_rows(
            [
                (MemberStatus::Active, true),
                (MemberStatus::Active, false),
                (MemberStatus::Inactive, true),
            ],
            PaymentsSummary {
                total_revenue: Decimal::new(150, 0),
                completed_count: 3,
            },
        );

        assert_eq!(stats.total_members, 3);
        assert_eq!(stats.active_count, 2);
        assert_eq!(stats.inactive_count, 1);
        assert_eq!(stats.id_created_count, 2);
        assert_eq!(stats.id_pending_count(), 1);
        assert_eq!(stats.total_revenue, Decimal::new(150, 0));
        assert_eq!(stats.completed_payments_count, 3);
    }
}
