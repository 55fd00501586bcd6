//! Infrastructure dashboard: polls a metrics endpoint for a compute
//! inventory and shows it as a web dashboard or on the terminal.

pub mod api;
pub mod chart;
pub mod config;
pub mod handlers;
pub mod mock_backend;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;
pub mod utils;
