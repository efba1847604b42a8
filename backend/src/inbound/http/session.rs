//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with typed
//! operations: the anti-forgery token, the authenticated identity, and
//! one-shot flash messages. This module is the only place that knows the
//! session key names.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionIdentity};

pub(crate) const STATE_KEY: &str = "state";
pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const FLASH_KEY: &str = "_flashes";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the anti-forgery token issued with the login page.
    pub fn set_state_token(&self, token: &str) -> Result<(), Error> {
        self.0
            .insert(STATE_KEY, token)
            .map_err(|err| Error::internal(format!("failed to persist state token: {err}")))
    }

    /// Fetch the anti-forgery token bound to this session, if any.
    pub fn state_token(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(STATE_KEY)
            .map_err(|err| Error::internal(format!("failed to read state token: {err}")))
    }

    /// Bind an authenticated identity to the session.
    pub fn set_identity(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|err| Error::internal(format!("failed to persist identity: {err}")))
    }

    /// Fetch the authenticated identity, if present.
    ///
    /// A cookie that fails to decode is treated as anonymous rather than an
    /// error; tampering should not grant a better outcome than logging out.
    pub fn identity(&self) -> Result<Option<SessionIdentity>, Error> {
        match self.0.get::<SessionIdentity>(IDENTITY_KEY) {
            Ok(identity) => Ok(identity),
            Err(err) => {
                tracing::warn!("invalid identity in session cookie: {err}");
                Ok(None)
            }
        }
    }

    /// Remove the identity and any pending state token, returning the
    /// session to anonymous.
    pub fn clear_identity(&self) {
        self.0.remove(IDENTITY_KEY);
        self.0.remove(STATE_KEY);
    }

    /// Queue a one-shot notice for the next rendered page.
    pub fn flash(&self, message: impl Into<String>) -> Result<(), Error> {
        let mut queued = self.peek_flashes();
        queued.push(message.into());
        self.0
            .insert(FLASH_KEY, queued)
            .map_err(|err| Error::internal(format!("failed to queue flash message: {err}")))
    }

    /// Drain all queued flash messages for rendering.
    pub fn take_flashes(&self) -> Vec<String> {
        let queued = self.peek_flashes();
        self.0.remove(FLASH_KEY);
        queued
    }

    fn peek_flashes(&self) -> Vec<String> {
        self.0
            .get::<Vec<String>>(FLASH_KEY)
            .unwrap_or_default()
            .unwrap_or_default()
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
