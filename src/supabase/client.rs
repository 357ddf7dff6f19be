//! Supabase REST client (PostgREST + GoTrue)

use crate::config::SupabaseConfig;
use crate::error::{AppError, Result};
use crate::supabase::{Article, AuthSession, NewAppointment, NewContact, PortalDatabase};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Response, StatusCode,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Fields projected for every article read
const ARTICLE_COLUMNS: &str = "id,title,slug,excerpt,author,category,image,published_at";

/// REST client for the hosted Supabase instance.
///
/// Stateless pass-through: no connection beyond reqwest's own pooling, no
/// transactions. A missing URL or key does not prevent startup; every call
/// then degrades to an explicit upstream error.
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.base_url.is_empty() || self.api_key.is_empty() {
            return Err(AppError::Upstream(
                "database service is not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Map a non-success REST response into the uniform error taxonomy.
    async fn rest_error(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::CONFLICT {
            AppError::Conflict("resource already exists".to_string())
        } else {
            AppError::Upstream(format!("database returned {status}: {body}"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlotRow {
    slot: String,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl PortalDatabase for SupabaseClient {
    async fn insert_contact(&self, contact: NewContact) -> Result<()> {
        self.ensure_configured()?;

        debug!(email = %contact.email, "Inserting contact message");

        let response = self
            .http
            .post(self.rest_url("contact_messages"))
            .headers(self.headers())
            .header("Prefer", "return=minimal")
            .json(&contact)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rest_error(response).await)
        }
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.ensure_configured()?;

        let response = self
            .http
            .get(self.rest_url("blog_articles"))
            .headers(self.headers())
            .query(&[
                ("select", ARTICLE_COLUMNS),
                ("published", "eq.true"),
                ("order", "published_at.desc"),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let articles = response
                .json::<Vec<Article>>()
                .await
                .map_err(|e| AppError::Upstream(format!("failed to parse article list: {e}")))?;
            Ok(articles)
        } else {
            Err(Self::rest_error(response).await)
        }
    }

    async fn get_article(&self, slug: &str) -> Result<Option<Article>> {
        self.ensure_configured()?;

        let slug_filter = format!("eq.{slug}");
        let response = self
            .http
            .get(self.rest_url("blog_articles"))
            .headers(self.headers())
            .query(&[
                ("select", ARTICLE_COLUMNS),
                ("slug", slug_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let mut articles = response
                .json::<Vec<Article>>()
                .await
                .map_err(|e| AppError::Upstream(format!("failed to parse article: {e}")))?;
            Ok(articles.pop())
        } else {
            Err(Self::rest_error(response).await)
        }
    }

    async fn booked_slots(&self, date: NaiveDate) -> Result<Vec<String>> {
        self.ensure_configured()?;

        let date_filter = format!("eq.{date}");
        let response = self
            .http
            .get(self.rest_url("appointments"))
            .headers(self.headers())
            .query(&[("select", "slot"), ("date", date_filter.as_str())])
            .send()
            .await?;

        if response.status().is_success() {
            let rows = response
                .json::<Vec<SlotRow>>()
                .await
                .map_err(|e| AppError::Upstream(format!("failed to parse booked slots: {e}")))?;
            Ok(rows.into_iter().map(|row| row.slot).collect())
        } else {
            Err(Self::rest_error(response).await)
        }
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<()> {
        self.ensure_configured()?;

        debug!(date = %appointment.date, slot = %appointment.slot, "Inserting appointment");

        let response = self
            .http
            .post(self.rest_url("appointments"))
            .headers(self.headers())
            .header("Prefer", "return=minimal")
            .json(&appointment)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rest_error(response).await)
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.ensure_configured()?;

        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .headers(self.headers())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status().is_success() {
            let session = response
                .json::<AuthSession>()
                .await
                .map_err(|e| AppError::Upstream(format!("failed to parse auth session: {e}")))?;
            Ok(session)
        } else {
            // The provider reports bad credentials as 400 with an error body
            let status = response.status();
            let body = response.json::<AuthErrorBody>().await.unwrap_or(AuthErrorBody {
                error_description: None,
                msg: None,
                error: None,
            });
            let message = body
                .error_description
                .or(body.msg)
                .or(body.error)
                .unwrap_or_else(|| "invalid credentials".to_string());

            // Only credential rejections become 401; a 429 or other client
            // error from the provider is an upstream problem, not bad
            // credentials
            let credentials_rejected = matches!(
                status,
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            );
            if credentials_rejected {
                Err(AppError::Unauthorized(message))
            } else {
                Err(AppError::Upstream(format!("auth service returned {status}: {message}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: String::new(),
            api_key: String::new(),
            anon_key: None,
            timeout_ms: 1000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_client_degrades_to_error() {
        let client = unconfigured_client();
        let err = client.list_articles().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_rest_url_joins_without_double_slash() {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: "https://example.supabase.co/".to_string(),
            api_key: "key".to_string(),
            anon_key: None,
            timeout_ms: 1000,
        })
        .unwrap();

        assert_eq!(
            client.rest_url("appointments"),
            "https://example.supabase.co/rest/v1/appointments"
        );
    }
}
