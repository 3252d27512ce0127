//! Dashboard overview.

use rust_decimal::Decimal;
use tracing::instrument;

use courtyard_core::DashboardStats;

use crate::components::list_engine::{self, DASHBOARD_RECENT, ListPage, ViewParams};
use crate::error::AppError;
use crate::filters::format_amount;
use crate::gateway::Gateway;

use super::queries::Queries;

/// Issued versus pending ID cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCardSplit {
    pub created: usize,
    pub pending: usize,
}

impl IdCardSplit {
    #[must_use]
    pub const fn from_stats(stats: &DashboardStats) -> Self {
        Self {
            created: stats.id_created_count,
            pending: stats.id_pending_count(),
        }
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct Overview {
    pub stats: DashboardStats,
    pub id_cards: IdCardSplit,
    pub recent: ListPage,
}

impl Overview {
    #[must_use]
    pub fn total_revenue(&self) -> Decimal {
        self.stats.total_revenue
    }

    /// Revenue formatted for display: `"12,500.00"`.
    #[must_use]
    pub fn revenue_display(&self) -> String {
        format_amount(self.stats.total_revenue)
    }
}

pub struct DashboardService<G> {
    queries: Queries<G>,
}

impl<G: Gateway> DashboardService<G> {
    #[must_use]
    pub const fn new(queries: Queries<G>) -> Self {
        Self { queries }
    }

    /// Load stats and the recent members together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if either load fails.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<Overview, AppError> {
        let (stats, recent) = tokio::join!(
            self.queries.dashboard_stats(),
            self.queries.recent_members(DASHBOARD_RECENT.page_size),
        );
        let stats = stats?;
        let recent = recent?;

        Ok(Overview {
            id_cards: IdCardSplit::from_stats(&stats),
            recent: list_engine::run(
                &DASHBOARD_RECENT,
                &recent,
                &ViewParams::new(&DASHBOARD_RECENT),
            ),
            stats,
        })
    }
}
