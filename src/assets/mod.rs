//! Static asset resolver with SPA fallback.
//!
//! Build artifacts are served from a local directory. Paths that do not
//! resolve to a real file get the HTML entry document with status 200 so the
//! client-side router can take over; client-route paths such as `/dashboard`
//! or `/blog/slug` exist only in the SPA's route table, never on disk.

use crate::config::AssetsConfig;
use axum::{
    http::{
        header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    response::{Html, IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Placeholder icon returned when no favicon exists in the asset directory.
const FALLBACK_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <rect width="100" height="100" rx="20" fill="#2563eb"/>
  <path d="M30 30 L70 30 L70 70 L30 70 Z" fill="none" stroke="white" stroke-width="5"/>
  <path d="M40 45 L60 45" stroke="white" stroke-width="5" stroke-linecap="round"/>
  <path d="M40 55 L55 55" stroke="white" stroke-width="5" stroke-linecap="round"/>
</svg>"##;

/// Last-resort page served when the entry document itself is unreadable.
const MAINTENANCE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Sitio en mantenimiento</title>
  <style>
    body { font-family: system-ui, sans-serif; text-align: center; padding: 40px 20px; }
    h1 { color: #2563eb; }
    button { background: #2563eb; color: white; border: none; padding: 12px 24px; cursor: pointer; border-radius: 4px; font-size: 16px; }
  </style>
</head>
<body>
  <h1>Sitio en mantenimiento</h1>
  <p>Estamos realizando mejoras en nuestro sitio. Por favor, inténtelo de nuevo en unos minutos.</p>
  <button onclick="window.location.reload()">Refrescar página</button>
</body>
</html>
"#;

/// Resolver for SPA build artifacts
#[derive(Debug, Clone)]
pub struct AssetResolver {
    dir: PathBuf,
    index_file: String,
    icon_cache: HeaderValue,
}

impl AssetResolver {
    pub fn new(config: &AssetsConfig) -> Self {
        let icon_cache =
            HeaderValue::from_str(&format!("public, max-age={}", config.icon_cache_secs))
                .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=86400"));

        Self {
            dir: PathBuf::from(&config.dir),
            index_file: config.index_file.clone(),
            icon_cache,
        }
    }

    /// Resolve a request path to a response. Never errors; the worst case
    /// is the maintenance page.
    pub async fn resolve(&self, path: &str) -> Response {
        let trimmed = path.trim_start_matches('/');

        if trimmed == "favicon.ico" || trimmed == "favicon.svg" {
            return self.serve_icon(trimmed).await;
        }

        // Only paths whose final segment looks like a file are served from
        // disk; everything else belongs to the client-side router.
        let is_file_like = trimmed
            .rsplit('/')
            .next()
            .map_or(false, |segment| segment.contains('.'));

        if is_file_like {
            if let Some(response) = self.serve_file(trimmed).await {
                return response;
            }
            debug!(path = %path, "Asset not found, falling back to entry document");
        }

        self.serve_index().await
    }

    /// Serve the favicon with a long cache lifetime, synthesizing a
    /// placeholder on miss instead of failing.
    async fn serve_icon(&self, name: &str) -> Response {
        if let Some(bytes) = self.read_asset(name).await {
            let mut response = (StatusCode::OK, bytes).into_response();
            response
                .headers_mut()
                .insert(CONTENT_TYPE, content_type_for(name));
            response
                .headers_mut()
                .insert(CACHE_CONTROL, self.icon_cache.clone());
            return response;
        }

        let mut response = (StatusCode::OK, FALLBACK_ICON).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("image/svg+xml"),
        );
        response
            .headers_mut()
            .insert(CACHE_CONTROL, self.icon_cache.clone());
        response
    }

    async fn serve_file(&self, path: &str) -> Option<Response> {
        let bytes = self.read_asset(path).await?;
        let mut response = (StatusCode::OK, bytes).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, content_type_for(path));
        Some(response)
    }

    /// The SPA fallback: the entry document with status 200 regardless of
    /// the original path.
    async fn serve_index(&self) -> Response {
        match self.read_asset(&self.index_file).await {
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    warn!(error = %e, "Entry document is not valid UTF-8");
                    Html(MAINTENANCE_PAGE).into_response()
                }
            },
            None => {
                warn!(index = %self.index_file, "Entry document unreadable, serving maintenance page");
                Html(MAINTENANCE_PAGE).into_response()
            }
        }
    }

    /// Read a file below the asset root. Traversal segments never escape
    /// the root; such paths simply miss.
    async fn read_asset(&self, relative: &str) -> Option<Vec<u8>> {
        let relative_path = Path::new(relative);
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        tokio::fs::read(self.dir.join(relative_path)).await.ok()
    }
}

/// Content type derived from the file extension
fn content_type_for(path: &str) -> HeaderValue {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let mime = match ext {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    };

    HeaderValue::from_static(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn resolver_for(dir: &Path) -> AssetResolver {
        let mut config = Settings::default().assets;
        config.dir = dir.to_string_lossy().to_string();
        AssetResolver::new(&config)
    }

    #[tokio::test]
    async fn test_spa_fallback_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>portal</html>").unwrap();

        let resolver = resolver_for(dir.path());
        let response = resolver.resolve("/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_index_serves_maintenance_page() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_for(dir.path());

        let response = resolver.resolve("/blog/some-post").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_favicon_miss_returns_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_for(dir.path());

        let response = resolver.resolve("/favicon.ico").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=86400"
        );
    }

    #[tokio::test]
    async fn test_existing_file_served_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.css"), "body {}").unwrap();

        let resolver = resolver_for(dir.path());
        let response = resolver.resolve("/app.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/css");
    }

    #[tokio::test]
    async fn test_traversal_never_escapes_asset_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>portal</html>").unwrap();

        let resolver = resolver_for(dir.path());
        // Falls back to the entry document instead of reading outside the root
        let response = resolver.resolve("/../etc/passwd.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
