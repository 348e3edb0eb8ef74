pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod validation;
