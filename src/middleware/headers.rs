//! CORS and security header policy.
//!
//! Every response leaving the gateway carries the same header set; CORS
//! preflight requests short-circuit here with an empty 204 before any
//! routing happens. This step is pure header composition and cannot fail.

use crate::config::Settings;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{
        header::{
            HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_SECURITY_POLICY,
            CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
        Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// The standard header set applied to every outbound response.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
    csp: HeaderValue,
}

impl HeaderPolicy {
    /// Build the policy from configuration. Invalid configured values fall
    /// back to permissive defaults rather than failing the request.
    pub fn new(settings: &Settings) -> Self {
        let allow_origin = HeaderValue::from_str(&settings.cors.allow_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        let allow_methods = HeaderValue::from_str(&settings.cors.allow_methods)
            .unwrap_or_else(|_| HeaderValue::from_static("GET, POST, OPTIONS"));
        let allow_headers = HeaderValue::from_str(&settings.cors.allow_headers)
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        let max_age = HeaderValue::from_str(&settings.cors.max_age_secs.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("86400"));

        let csp = HeaderValue::from_str(&Self::build_csp(settings))
            .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"));

        Self {
            allow_origin,
            allow_methods,
            allow_headers,
            max_age,
            csp,
        }
    }

    /// Content-Security-Policy permitting self-origin scripts/styles, the
    /// Google Fonts CDN, and the configured Supabase origin for XHR and
    /// WebSocket connections.
    fn build_csp(settings: &Settings) -> String {
        let mut connect_src = "'self'".to_string();
        if !settings.supabase.url.is_empty() {
            let https = settings.supabase.url.trim_end_matches('/');
            let wss = https.replacen("https://", "wss://", 1);
            connect_src = format!("'self' {https} {wss}");
        }

        format!(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
             style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
             font-src 'self' https://fonts.gstatic.com; \
             img-src 'self' data: blob:; \
             connect-src {connect_src}; \
             object-src 'none'; \
             base-uri 'self'; \
             frame-ancestors 'self'"
        )
    }

    /// The early CORS-only exit for `OPTIONS *`.
    pub fn preflight_response(&self) -> Response {
        let mut headers = HeaderMap::new();
        self.insert_cors(&mut headers);
        (StatusCode::NO_CONTENT, headers).into_response()
    }

    fn insert_cors(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
    }

    /// Merge the standard set into an already-produced response. The CSP is
    /// attached to HTML responses only.
    pub fn apply(&self, headers: &mut HeaderMap) {
        self.insert_cors(headers);
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );

        let is_html = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("text/html"));
        if is_html {
            headers.insert(CONTENT_SECURITY_POLICY, self.csp.clone());
        }
    }
}

/// Middleware attaching the standard header set to every response and
/// short-circuiting CORS preflight requests.
pub async fn standard_headers(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let policy = HeaderPolicy::new(&state.settings);

    if request.method() == Method::OPTIONS {
        return policy.preflight_response();
    }

    let mut response = next.run(request).await;
    policy.apply(response.headers_mut());
    response
}
