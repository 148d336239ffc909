//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services, and remain testable against the
//! in-memory store.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    EventRepository, ForumRepository, Mailer, MessageRepository, NotificationRepository,
    PaymentRepository, PlotRepository, UserRepository, WorkDayRepository,
};
use crate::domain::{
    ApiResult, ApplicationService, DashboardService, Error, NotificationService, User,
};
use crate::inbound::http::session::SessionContext;
use crate::outbound::memory::MemoryStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub plots: Arc<dyn PlotRepository>,
    pub work_days: Arc<dyn WorkDayRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub forum: Arc<dyn ForumRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub events: Arc<dyn EventRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub applications: Arc<ApplicationService>,
    pub notifier: Arc<NotificationService>,
    pub dashboard: Arc<DashboardService>,
}

impl HttpState {
    /// Wire the full dependency graph over one shared store adapter.
    ///
    /// The in-process [`MemoryStore`] is the production store for this
    /// system; it backs every repository port at once.
    pub fn over_store(
        store: Arc<MemoryStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifier = Arc::new(NotificationService::new(
            store.clone(),
            store.clone(),
            mailer,
            clock.clone(),
        ));
        let applications = Arc::new(ApplicationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let dashboard = Arc::new(DashboardService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock,
        ));
        Self {
            users: store.clone(),
            plots: store.clone(),
            work_days: store.clone(),
            payments: store.clone(),
            forum: store.clone(),
            messages: store.clone(),
            events: store.clone(),
            notifications: store,
            applications,
            notifier,
            dashboard,
        }
    }

    /// Resolve the session's user against the store, if a session exists.
    ///
    /// A stale id (user deleted, cookie from another deployment) reads as
    /// no session rather than an error.
    pub async fn session_user(&self, session: &SessionContext) -> ApiResult<Option<User>> {
        match session.user_id()? {
            Some(id) => Ok(self.users.find(id).await?),
            None => Ok(None),
        }
    }

    /// Resolve the session's user or fail with `401 Unauthorized`.
    pub async fn require_session_user(&self, session: &SessionContext) -> ApiResult<User> {
        self.session_user(session)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}
