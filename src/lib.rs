pub mod config;
pub mod constants;
pub mod error;
pub mod grafana;
pub mod logging;
pub mod sanitize;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
