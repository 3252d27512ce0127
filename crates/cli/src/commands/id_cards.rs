//! ID-card studio commands.
//!
//! # Usage
//!
//! ```bash
//! # Members with an issued card, optionally showing one card
//! cy-cli id-cards list --search tower --select 4f1c3a9e-8a2b-4c1d-9e0f-1234567890ab
//!
//! # Members still waiting for a card
//! cy-cli id-cards pending
//!
//! # Mark a card as issued
//! cy-cli id-cards issue 4f1c3a9e-8a2b-4c1d-9e0f-1234567890ab
//! ```

use courtyard_admin::Console;
use courtyard_admin::components::data_table::id_card_studio_config;
use courtyard_admin::components::list_engine::{ID_CARD_STUDIO, ViewParams};
use courtyard_admin::gateway::Gateway;
use courtyard_admin::services::{IdCard, SelectedCard};
use courtyard_core::MemberId;
use tracing::{info, warn};

use super::CliError;
use super::members::{ListOptions, log_page};

fn log_card(card: &IdCard) {
    info!("+------------------------------------------+");
    info!("  {}", card.display_name);
    info!("  {}", card.unit_line);
    info!("  Member no. {}", card.card_number);
    info!(
        "  Photo: {}",
        card.avatar_url.as_deref().unwrap_or(card.initials.as_str())
    );
    info!("  Status: {}", card.status);
    info!("+------------------------------------------+");
}

/// List the studio grid and, with `selected`, that member's card.
///
/// # Errors
///
/// Returns an error for invalid options or when the members cannot be
/// loaded.
pub async fn list<G: Gateway>(
    console: &Console<G>,
    options: &ListOptions,
    selected: Option<MemberId>,
) -> Result<(), CliError> {
    let mut params = ViewParams::new(&ID_CARD_STUDIO);
    ListOptions {
        page_size: None,
        ..options.clone()
    }
    .apply(&mut params)?;

    let view = console.id_cards().studio(&params, selected).await?;
    log_page(&id_card_studio_config(), &view.grid);

    match view.selected {
        Some(SelectedCard::Found(card)) => log_card(&card),
        Some(SelectedCard::NotFound(id)) => warn!("No member with id {id}"),
        None => {}
    }
    Ok(())
}

/// List members without a card, by name.
///
/// # Errors
///
/// Returns the backend failure.
pub async fn pending<G: Gateway>(console: &Console<G>) -> Result<(), CliError> {
    let pending = console.id_cards().pending().await?;
    for member in &pending {
        info!("{:<8} {} ({})", member.member_id, member.name, member.unit);
    }
    info!("{} member(s) waiting for an ID card", pending.len());
    Ok(())
}

/// Issue the member's card.
///
/// # Errors
///
/// Returns the backend failure.
pub async fn issue<G: Gateway>(console: &Console<G>, id: MemberId) -> Result<(), CliError> {
    let card = console.id_cards().issue(id).await?;
    info!("ID card issued");
    log_card(&card);
    Ok(())
}
