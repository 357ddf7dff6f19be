//! Middleware module - standard response headers and CORS preflight

pub mod headers;

pub use headers::{standard_headers, HeaderPolicy};
