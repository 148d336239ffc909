//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting, reading, and clearing the
//! authenticated user id.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: i32) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<i32>, Error> {
        self.0
            .get::<i32>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))
    }

    /// Drop all session state (logout).
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
