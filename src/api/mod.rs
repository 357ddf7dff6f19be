//! API module - HTTP routes, handlers, and models

pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
