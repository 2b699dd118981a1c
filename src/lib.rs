//! # Graph Proxy Library
//!
//! Provides functionality for proxying directory-service user lookups
//! behind an OAuth2 client-credential token that is acquired lazily,
//! cached with an expiry safety margin, and attached to outbound requests.
//!
//! Modules:
//! - `config` — service configuration and credential types
//! - `cache` — access-token cache implementation
//! - `auth` — token provider and request-signing client
//! - `graph` — directory API client and DTO mapping
//! - `server` — HTTP surface (user proxy routes, account redirects)

pub mod config;
pub mod cache;
pub mod auth;
pub mod graph;
pub mod server;
pub mod observability;
pub mod helpers;
pub mod utils;
pub mod tests;

pub use crate::config::settings::ServiceConfig;
