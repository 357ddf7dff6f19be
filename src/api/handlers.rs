//! HTTP request handlers

use crate::api::extract::JsonOrForm;
use crate::api::models::{
    AppointmentRequest, AvailabilityQuery, AvailabilityResponse, CategoryInfo, ContactRequest,
    HealthResponse, LoginRequest, LoginResponse, SiteConfigResponse, SuccessResponse,
};
use crate::error::AppError;
use crate::notify::NotificationEvent;
use crate::supabase::{Article, NewAppointment, NewContact};
use crate::AppState;
use axum::{
    extract::{Host, OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Consultation slots offered every working day
const DAILY_SLOTS: [&str; 7] = [
    "09:00", "10:00", "11:00", "12:00", "15:00", "16:00", "17:00",
];

/// Blog categories shown in the site navigation
const BLOG_CATEGORIES: [(&str, &str, u32); 6] = [
    ("derecho-constitucional", "Derecho Constitucional", 7),
    ("derecho-familiar", "Derecho Familiar", 12),
    ("derecho-laboral", "Derecho Laboral", 9),
    ("derecho-penal", "Derecho Penal", 8),
    ("derecho-transito", "Leyes de Tránsito", 5),
    ("derecho-civil", "Derecho Civil", 11),
];

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "invalid date '{date}': expected YYYY-MM-DD format"
        ))
    })
}

/// Receive a contact form submission
#[utoipa::path(
    post,
    path = "/api/contact/send",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message stored", body = SuccessResponse),
        (status = 400, description = "Missing required field"),
    )
)]
pub async fn contact_send(
    State(state): State<Arc<AppState>>,
    JsonOrForm(request): JsonOrForm<ContactRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require(&request.name, "name")?;
    require(&request.email, "email")?;
    require(&request.message, "message")?;

    info!(email = %request.email, "Received contact message");

    state
        .db
        .insert_contact(NewContact {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            message: request.message.clone(),
        })
        .await?;

    state.notifier.send(
        NotificationEvent::new(
            "contact_message",
            format!("New contact message from {}", request.name),
        )
        .with_contact_email(&request.email),
    );

    Ok(Json(SuccessResponse {
        success: true,
        message: "Mensaje enviado correctamente".to_string(),
    }))
}

/// List published blog articles, newest first
#[utoipa::path(
    get,
    path = "/api/blog/articles",
    tag = "Blog",
    responses(
        (status = 200, description = "Published articles", body = [Article]),
    )
)]
pub async fn blog_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state.db.list_articles().await?;
    Ok(Json(articles))
}

/// Fetch one article by slug
#[utoipa::path(
    get,
    path = "/api/blog/article/{slug}",
    tag = "Blog",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "The article", body = Article),
        (status = 404, description = "No article with that slug"),
    )
)]
pub async fn blog_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, AppError> {
    let article = state
        .db
        .get_article(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("article not found".to_string()))?;

    Ok(Json(article))
}

/// List blog categories
#[utoipa::path(
    get,
    path = "/api/blog/categories",
    tag = "Blog",
    responses(
        (status = 200, description = "Category list", body = [CategoryInfo]),
    )
)]
pub async fn blog_categories() -> Json<Vec<CategoryInfo>> {
    let categories = BLOG_CATEGORIES
        .iter()
        .map(|(id, name, count)| CategoryInfo {
            id: (*id).to_string(),
            name: (*name).to_string(),
            count: *count,
        })
        .collect();

    Json(categories)
}

/// Available and booked consultation slots for a day
#[utoipa::path(
    get,
    path = "/api/appointments/available",
    tag = "Appointments",
    params(("date" = String, Query, description = "Day in YYYY-MM-DD format")),
    responses(
        (status = 200, description = "Slot availability", body = AvailabilityResponse),
        (status = 400, description = "Missing or malformed date"),
    )
)]
pub async fn appointments_available(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let raw_date = query
        .date
        .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
    let date = parse_date(&raw_date)?;

    let booked = state.db.booked_slots(date).await?;

    let available = DAILY_SLOTS
        .iter()
        .map(|slot| (*slot).to_string())
        .filter(|slot| !booked.contains(slot))
        .collect();

    Ok(Json(AvailabilityResponse {
        date: date.to_string(),
        available_slots: available,
        booked_slots: booked,
    }))
}

/// Book a consultation slot
#[utoipa::path(
    post,
    path = "/api/appointments/create",
    tag = "Appointments",
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Appointment booked", body = SuccessResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 409, description = "Slot already booked"),
    )
)]
pub async fn appointments_create(
    State(state): State<Arc<AppState>>,
    JsonOrForm(request): JsonOrForm<AppointmentRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    require(&request.name, "name")?;
    require(&request.email, "email")?;
    require(&request.date, "date")?;
    require(&request.slot, "slot")?;

    let date = parse_date(&request.date)?;

    if !DAILY_SLOTS.contains(&request.slot.as_str()) {
        return Err(AppError::Validation(format!(
            "slot '{}' is not offered; available slots are {}",
            request.slot,
            DAILY_SLOTS.join(", ")
        )));
    }

    // Best-effort re-check right before the insert. This is a read-then-write
    // race; the storage layer's uniqueness constraint is the backstop.
    let booked = state.db.booked_slots(date).await?;
    if booked.contains(&request.slot) {
        return Err(AppError::Conflict(format!(
            "slot {} on {} is already booked",
            request.slot, date
        )));
    }

    info!(date = %date, slot = %request.slot, "Booking appointment");

    state
        .db
        .insert_appointment(NewAppointment {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            date,
            slot: request.slot.clone(),
            notes: request.notes.clone(),
        })
        .await?;

    state.notifier.send(
        NotificationEvent::new(
            "appointment_created",
            format!("New appointment on {} at {}", date, request.slot),
        )
        .with_contact_email(&request.email),
    );

    Ok(Json(SuccessResponse {
        success: true,
        message: format!("Cita reservada para el {} a las {}", date, request.slot),
    }))
}

/// Sign in against the external auth provider
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Credentials rejected by the provider"),
    )
)]
pub async fn auth_login(
    State(state): State<Arc<AppState>>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    require(&request.email, "email")?;
    require(&request.password, "password")?;

    let session = state.db.sign_in(&request.email, &request.password).await?;

    info!(email = %request.email, "User signed in");

    Ok(Json(LoginResponse {
        token: Uuid::new_v4().to_string(),
        access_token: session.access_token,
        user: session.user,
    }))
}

/// Public client bootstrap configuration
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "Config",
    responses(
        (status = 200, description = "Client configuration", body = SiteConfigResponse),
    )
)]
pub async fn site_config(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
) -> Json<SiteConfigResponse> {
    let scheme = if host.starts_with("localhost") || host.starts_with("127.") {
        "http"
    } else {
        "https"
    };

    Json(SiteConfigResponse {
        supabase_url: state.settings.supabase.url.clone(),
        supabase_key: state.settings.supabase.public_key().to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        api_base_url: format!("{scheme}://{host}"),
        config_loaded: true,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway is up", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Uniform envelope for wrong-verb requests on matched routes
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Structured 404 for unmatched API paths, echoing the requested path
pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> Response {
    let body = Json(json!({
        "error": "endpoint not found",
        "path": uri.path(),
    }));
    (StatusCode::NOT_FOUND, body).into_response()
}

/// Top-level fallback: static assets with SPA fallback
pub async fn serve_asset(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    state.assets.resolve(uri.path()).await
}
