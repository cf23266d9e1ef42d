//! Support triage — keyword-matched automated replies for support inquiries.

pub mod analytics;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod triage;
