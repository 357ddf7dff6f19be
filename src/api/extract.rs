//! Request body extraction for mutating API routes.
//!
//! The SPA posts JSON, but the plain HTML contact form submits
//! form-encoded bodies; both are accepted. Malformed bodies surface as
//! validation errors in the uniform envelope instead of axum's default
//! rejections.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{Form, FromRequest, Json, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

/// Body extractor accepting `application/json` or
/// `application/x-www-form-urlencoded`.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("invalid form body: {e}")))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))?;
        Ok(Self(value))
    }
}
