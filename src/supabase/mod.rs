//! External database/auth service integration.
//!
//! The system of record is a hosted Supabase instance (Postgres + GoTrue)
//! consumed exclusively over REST. The [`PortalDatabase`] trait is the seam
//! between handlers and the wire client so tests can substitute a stub.

pub mod client;

pub use client::SupabaseClient;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A published blog article, projected to the fields the SPA renders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A contact message to persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// An appointment booking to persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub date: NaiveDate,
    pub slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A session returned by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// Named operations against the external database/auth service.
///
/// Query-building conventions (PostgREST filters, auth grant types) are an
/// implementation detail of [`SupabaseClient`]; handlers only see these
/// operations.
#[async_trait]
pub trait PortalDatabase: Send + Sync {
    /// Persist a contact message
    async fn insert_contact(&self, contact: NewContact) -> Result<()>;

    /// Published articles, newest first. An empty table is an empty list,
    /// never an error.
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// Look up one article by slug
    async fn get_article(&self, slug: &str) -> Result<Option<Article>>;

    /// Slots already booked on the given date
    async fn booked_slots(&self, date: NaiveDate) -> Result<Vec<String>>;

    /// Persist an appointment booking
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<()>;

    /// Delegate a credential check to the auth provider
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;
}
