//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for the document store and the identity provider.

pub mod identity;
pub mod store;
