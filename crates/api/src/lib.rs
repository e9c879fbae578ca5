//! HTTP auth gateway: server, routing, and request gating.

pub mod app;
pub mod config;
pub mod context;
pub mod directory;
pub mod guards;
pub mod middleware;
