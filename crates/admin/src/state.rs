//! Console state shared by every front end.

use std::sync::Arc;

use tracing::info;

use crate::backend::BackendClient;
use crate::cache::QueryCache;
use crate::components::list_engine::{MEMBERS_TABLE, ViewParams};
use crate::config::ConsoleConfig;
use crate::error::AppError;
use crate::gateway::Gateway;
use crate::services::{
    DashboardService, IdCardService, MemberService, ProfileService, Queries, SessionManager,
};

/// The console: one gateway, one query cache and the services over them.
///
/// Cheap to clone; clones share the cache.
pub struct Console<G> {
    inner: Arc<ConsoleInner<G>>,
}

struct ConsoleInner<G> {
    config: ConsoleConfig,
    queries: Queries<G>,
    members: MemberService<G>,
    profiles: ProfileService<G>,
    id_cards: IdCardService<G>,
    dashboard: DashboardService<G>,
}

impl<G> Clone for Console<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Console<BackendClient> {
    /// Connect to the hosted backend.
    ///
    /// Returns the console together with the session manager whose channel
    /// feeds the console's bearer token. Keep the manager alive for as long
    /// as the console is used.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the HTTP client cannot be built.
    pub fn connect(
        config: &ConsoleConfig,
    ) -> Result<(Self, SessionManager<BackendClient>), AppError> {
        let client = BackendClient::new(&config.backend)?;
        let session = SessionManager::start(Arc::new(client.clone()));
        let gateway = client.with_session(session.subscribe());

        info!(backend = %gateway.base_url(), "Console connected");
        Ok((Self::new(config.clone(), Arc::new(gateway)), session))
    }
}

impl<G: Gateway> Console<G> {
    #[must_use]
    pub fn new(config: ConsoleConfig, gateway: Arc<G>) -> Self {
        let queries = Queries::new(gateway, QueryCache::new(&config.cache));

        Self {
            inner: Arc::new(ConsoleInner {
                members: MemberService::new(queries.clone()),
                profiles: ProfileService::new(queries.clone()),
                id_cards: IdCardService::new(queries.clone()),
                dashboard: DashboardService::new(queries.clone()),
                queries,
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn queries(&self) -> &Queries<G> {
        &self.inner.queries
    }

    #[must_use]
    pub fn members(&self) -> &MemberService<G> {
        &self.inner.members
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileService<G> {
        &self.inner.profiles
    }

    #[must_use]
    pub fn id_cards(&self) -> &IdCardService<G> {
        &self.inner.id_cards
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardService<G> {
        &self.inner.dashboard
    }

    /// Fresh members-table parameters with the configured page size.
    #[must_use]
    pub fn members_view_params(&self) -> ViewParams {
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.set_page_size(self.inner.config.default_page_size, 0);
        params
    }

    /// Drop every cached query.
    pub fn clear_cache(&self) {
        self.inner.queries.cache().invalidate_all();
    }
}
