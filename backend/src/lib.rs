//! Catalog web application: OAuth2 login against an external identity
//! provider, owner-gated CRUD over categories and items, server-rendered
//! HTML pages, and a read-only JSON export of the full catalog.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
