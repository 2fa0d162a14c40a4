//! HTTP inbound adapter.
//!
//! Controllers and middleware are written against the framework-neutral
//! contract in [`adapter`]; [`adapter::actix`] binds them to actix-web.

pub mod adapter;
pub mod error;
pub mod health;
pub mod middleware;
pub mod root;
pub mod routes;
pub mod schemas;
pub mod users;
