//! Dashboard summary.

use courtyard_admin::Console;
use courtyard_admin::components::data_table::recent_members_config;
use courtyard_admin::gateway::Gateway;
use tracing::info;

use super::CliError;
use super::members::log_page;

/// Log the dashboard: member counts, revenue, ID-card split and the
/// newest members.
///
/// # Errors
///
/// Returns the backend failure.
pub async fn show<G: Gateway>(console: &Console<G>) -> Result<(), CliError> {
    let overview = console.dashboard().overview().await?;
    let stats = &overview.stats;

    info!(
        "Members: {} total, {} active, {} inactive",
        stats.total_members, stats.active_count, stats.inactive_count
    );
    info!(
        "Revenue: {} from {} completed payment(s)",
        overview.revenue_display(),
        stats.completed_payments_count
    );
    info!(
        "ID cards: {} issued, {} pending",
        overview.id_cards.created, overview.id_cards.pending
    );
    info!("Recently added:");
    log_page(&recent_members_config(), &overview.recent);
    Ok(())
}
