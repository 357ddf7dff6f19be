//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::middleware::standard_headers;
use crate::supabase::Article;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portal Edge Gateway API",
        version = "0.3.0",
        description = "Edge router for the law-firm client portal: contact, blog, appointments and auth endpoints backed by Supabase.",
        license(name = "MIT"),
    ),
    paths(
        handlers::contact_send,
        handlers::blog_articles,
        handlers::blog_article,
        handlers::blog_categories,
        handlers::appointments_available,
        handlers::appointments_create,
        handlers::auth_login,
        handlers::site_config,
        handlers::health_check,
    ),
    components(schemas(
        ContactRequest,
        SuccessResponse,
        CategoryInfo,
        AvailabilityResponse,
        AppointmentRequest,
        LoginRequest,
        LoginResponse,
        SiteConfigResponse,
        HealthResponse,
        Article,
    )),
    tags(
        (name = "Contact", description = "Contact form endpoints"),
        (name = "Blog", description = "Blog article endpoints"),
        (name = "Appointments", description = "Consultation booking endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Config", description = "Client bootstrap configuration"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// The full application service: the router wrapped so trailing slashes
/// are stripped before routing, making `/api/blog/` and `/api/blog` hit
/// the same handler.
pub fn create_app(state: Arc<crate::AppState>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

/// Create the main application router.
///
/// Dispatch order: CORS preflight short-circuits in the header middleware,
/// `/api/*` goes to the JSON API, everything else falls back to the static
/// asset resolver.
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let features = &state.settings.features;

    // Wrong-verb hits on a matched route answer with the uniform envelope
    // instead of axum's empty-body 405
    let wrong_method = handlers::method_not_allowed;

    let mut api_routes = Router::new()
        .route("/config", get(handlers::site_config).fallback(wrong_method))
        .route("/health", get(handlers::health_check).fallback(wrong_method))
        .route("/auth/login", post(handlers::auth_login).fallback(wrong_method));

    if features.contact {
        api_routes = api_routes
            .route("/contact/send", post(handlers::contact_send).fallback(wrong_method));
    }

    if features.blog {
        api_routes = api_routes
            .route("/blog", get(handlers::blog_articles).fallback(wrong_method))
            .route("/blog/articles", get(handlers::blog_articles).fallback(wrong_method))
            .route("/blog/article/:slug", get(handlers::blog_article).fallback(wrong_method))
            .route("/blog/categories", get(handlers::blog_categories).fallback(wrong_method));
    }

    if features.appointments {
        api_routes = api_routes
            .route(
                "/appointments/available",
                get(handlers::appointments_available).fallback(wrong_method),
            )
            .route(
                "/appointments/create",
                post(handlers::appointments_create).fallback(wrong_method),
            );
    }

    // Unmatched /api paths get the structured 404 with the echoed path
    let api_routes = api_routes
        .fallback(handlers::api_not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes under /api prefix
        .nest("/api", api_routes)
        // Static assets with SPA fallback for everything else
        .fallback(handlers::serve_asset)
        .with_state(state.clone())
        // Standard header set + CORS preflight short-circuit
        .layer(from_fn_with_state(state, standard_headers))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}
