//! ID-card studio: the card grid and the card for the selected member.

use std::sync::Arc;

use tracing::instrument;

use courtyard_core::{Member, MemberId, MemberStatus};

use crate::components::list_engine::{self, ID_CARD_STUDIO, ListPage, ViewParams};
use crate::error::AppError;
use crate::filters::initials;
use crate::gateway::Gateway;

use super::members::MemberService;
use super::queries::Queries;

/// What a printed card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCard {
    pub member_id: MemberId,
    pub display_name: String,
    /// `"Unit 4B (Owner)"`
    pub unit_line: String,
    /// The member number.
    pub card_number: String,
    pub avatar_url: Option<String>,
    /// Shown when there is no avatar.
    pub initials: String,
    pub status: MemberStatus,
}

impl IdCard {
    #[must_use]
    pub fn from_member(member: &Member) -> Self {
        Self {
            member_id: member.id,
            display_name: member.name.clone(),
            unit_line: format!("Unit {} ({})", member.unit, member.member_type),
            card_number: member.member_id.clone(),
            avatar_url: member
                .avatar_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            initials: initials(&member.name),
            status: member.status,
        }
    }
}

/// The member picked in the studio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedCard {
    Found(IdCard),
    /// The id no longer resolves to a member.
    NotFound(MemberId),
}

/// Studio screen state.
#[derive(Debug, Clone)]
pub struct StudioView {
    pub grid: ListPage,
    pub selected: Option<SelectedCard>,
}

pub struct IdCardService<G> {
    queries: Queries<G>,
    members: MemberService<G>,
}

impl<G: Gateway> IdCardService<G> {
    #[must_use]
    pub fn new(queries: Queries<G>) -> Self {
        Self {
            members: MemberService::new(queries.clone()),
            queries,
        }
    }

    /// Build the studio screen.
    ///
    /// The grid only lists members whose card was issued. A selection whose
    /// record is gone yields [`SelectedCard::NotFound`] while the grid still
    /// renders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the member list or the selected
    /// member cannot be loaded.
    #[instrument(skip(self, params))]
    pub async fn studio(
        &self,
        params: &ViewParams,
        selected: Option<MemberId>,
    ) -> Result<StudioView, AppError> {
        let members = self.queries.members(None).await?;
        let grid = list_engine::run(&ID_CARD_STUDIO, &members, params);

        let selected = match selected {
            Some(id) => Some(self.card(id).await?),
            None => None,
        };

        Ok(StudioView { grid, selected })
    }

    /// The card for one member.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the member cannot be loaded.
    pub async fn card(&self, id: MemberId) -> Result<SelectedCard, AppError> {
        Ok(match self.queries.member(id).await? {
            Some(member) => SelectedCard::Found(IdCard::from_member(&member)),
            None => SelectedCard::NotFound(id),
        })
    }

    /// Issue the member's card and return it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the update fails.
    pub async fn issue(&self, id: MemberId) -> Result<IdCard, AppError> {
        let member = self.members.issue_id_card(id).await?;
        Ok(IdCard::from_member(&member))
    }

    /// Members still waiting for a card, by name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the member list cannot be loaded.
    pub async fn pending(&self) -> Result<Vec<Member>, AppError> {
        let members: Arc<Vec<Member>> = self.queries.members(None).await?;
        let mut pending: Vec<Member> = members
            .iter()
            .filter(|m| !m.id_card_created)
            .cloned()
            .collect();
        pending.sort_by(|a, b| list_engine::locale_cmp(&a.name, &b.name));
        Ok(pending)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::components::list_engine::{IdCardFilter, SortKey, SortOrder};
    use crate::config::CacheConfig;
    use crate::testing::{InMemoryGateway, fixtures};

    fn service(gateway: &Arc<InMemoryGateway>) -> IdCardService<InMemoryGateway> {
        IdCardService::new(Queries::new(
            Arc::clone(gateway),
            QueryCache::new(&CacheConfig::default()),
        ))
    }

    fn issued(name: &str) -> Member {
        let mut member = fixtures::member(name);
        member.id_card_created = true;
        member
    }

    #[test]
    fn test_card_view_model() {
        let mut member = fixtures::member("asha rao");
        member.member_id = "M-0007".to_string();
        member.avatar_url = Some("  ".to_string());

        let card = IdCard::from_member(&member);
        assert_eq!(card.unit_line, "Unit 4B (Owner)");
        assert_eq!(card.card_number, "M-0007");
        assert_eq!(card.initials, "AR");
        assert_eq!(card.avatar_url, None);
        assert_eq!(card.status, MemberStatus::Active);
    }

    #[tokio::test]
    async fn test_grid_only_shows_issued_cards() {
        let gateway = Arc::new(InMemoryGateway::default());
        gateway.seed_member(issued("Zara"));
        gateway.seed_member(issued("Arjun"));
        gateway.seed_member(fixtures::member("Pending Person"));
        let service = service(&gateway);

        let mut params = ViewParams::new(&ID_CARD_STUDIO);
        params.set_id_card_filter(IdCardFilter::NotCreated);
        params.set_sort(SortKey::Name, SortOrder::Asc);
        let view = service.studio(&params, None).await.unwrap();

        let names: Vec<_> = view.grid.items.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Arjun", "Zara"]);
        assert!(view.selected.is_none());
    }

    #[tokio::test]
    async fn test_missing_selection_still_renders_grid() {
        let gateway = Arc::new(InMemoryGateway::default());
        gateway.seed_member(issued("Arjun"));
        let service = service(&gateway);
        let missing = MemberId::random();

        let view = service
            .studio(&ViewParams::new(&ID_CARD_STUDIO), Some(missing))
            .await
            .unwrap();

        assert_eq!(view.grid.total_count, 1);
        assert_eq!(view.selected, Some(SelectedCard::NotFound(missing)));
    }

    #[tokio::test]
    async fn test_issue_moves_member_into_grid() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        let service = service(&gateway);
        let params = ViewParams::new(&ID_CARD_STUDIO);

        assert!(service.studio(&params, None).await.unwrap().grid.is_empty());
        assert_eq!(service.pending().await.unwrap().len(), 1);

        let card = service.issue(member.id).await.unwrap();
        assert_eq!(card.display_name, "Asha Rao");

        let view = service.studio(&params, Some(member.id)).await.unwrap();
        assert_eq!(view.grid.total_count, 1);
        assert!(matches!(view.selected, Some(SelectedCard::Found(_))));
        assert!(service.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_issue_reports_backend_error() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        gateway.fail_on("update_member");

        let err = service(&gateway).issue(member.id).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        assert!(!gateway.members()[0].id_card_created);
    }
}
