//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! domain ports and stay testable without real infrastructure.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryRepository, IdentityProvider, ItemRepository, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    /// OAuth2 client id this application was issued; the token audience
    /// check compares against it.
    pub client_id: String,
}
