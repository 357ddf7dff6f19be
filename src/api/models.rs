//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contact form submission
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ContactRequest {
    /// Sender name
    #[serde(default)]
    pub name: String,

    /// Sender email address
    #[serde(default)]
    pub email: String,

    /// Optional phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Message body
    #[serde(default)]
    pub message: String,
}

/// Generic success response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

/// Blog category with article count
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub count: u32,
}

/// Query string for the availability endpoint
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvailabilityQuery {
    /// Requested day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

/// Slot availability for one day
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub date: String,
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

/// Appointment booking request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AppointmentRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    /// Requested day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// Requested time slot, e.g. `10:00`
    #[serde(default)]
    pub slot: String,

    #[serde(default)]
    pub notes: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Login response: a synthesized session id plus the provider session
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session id minted by this gateway
    pub token: String,

    /// Provider access token for direct Supabase calls from the SPA
    pub access_token: String,

    /// User record as returned by the auth provider
    #[schema(value_type = Object)]
    pub user: serde_json::Value,
}

/// Public client bootstrap configuration
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SiteConfigResponse {
    pub supabase_url: String,
    pub supabase_key: String,
    pub app_version: String,
    pub api_base_url: String,
    pub config_loaded: bool,
    pub timestamp: String,
}

/// Liveness probe response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
