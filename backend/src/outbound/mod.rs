//! Outbound adapters: persistence and the identity provider.

pub mod google;
pub mod persistence;
