//! Main entry point for the Portal Edge Gateway

use axum::{extract::Request, ServiceExt};
use portal_edge_gateway::{
    api, assets::AssetResolver, config::Settings, notify::Notifier, supabase::SupabaseClient,
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();

    info!("Starting Portal Edge Gateway");

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;
    info!(
        "Loaded configuration: server={}:{} supabase_configured={}",
        settings.server.host,
        settings.server.port,
        settings.supabase.is_configured()
    );

    let settings = Arc::new(settings);

    // External collaborators
    let db = Arc::new(SupabaseClient::new(&settings.supabase)?);
    let notifier = Arc::new(Notifier::new(&settings.notify));
    let assets = AssetResolver::new(&settings.assets);

    // Create application state
    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        db,
        notifier,
        assets,
    });

    // Build the router
    let app = api::routes::create_app(app_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
