//! Portal Edge Gateway
//!
//! A Rust-based edge router for the law-firm client portal. A single entry
//! point receives all site traffic and dispatches it to CORS preflight
//! handling, the JSON API (backed by a hosted Supabase instance), or static
//! asset serving with SPA fallback.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod supabase;

pub use error::{AppError, Result};

use std::sync::Arc;

use assets::AssetResolver;
use notify::Notifier;
use supabase::PortalDatabase;

/// Application state shared across all handlers.
///
/// Configuration is loaded once at startup and never mutated. There is no
/// cache, pool, or session store here; everything durable lives in the
/// external database.
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub db: Arc<dyn PortalDatabase>,
    pub notifier: Arc<Notifier>,
    pub assets: AssetResolver,
}
