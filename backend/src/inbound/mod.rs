//! Inbound adapters that translate external requests into use case calls
//! while keeping framework details at the edge.
//!
//! HTTP is the only transport; its controllers live under [`http`].

pub mod http;
