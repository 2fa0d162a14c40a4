//! Backend library modules.
//!
//! Layers, innermost first:
//!
//! - [`domain`]: entities, validation and port traits
//! - [`application`]: use cases over the domain ports
//! - [`outbound`]: port implementations (in-memory store, probes, auth)
//! - [`inbound`]: the HTTP surface
//! - [`server`]: composition root wiring the layers together

pub mod application;
pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
