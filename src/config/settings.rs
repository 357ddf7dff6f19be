//! Application settings and configuration management

use crate::error::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub assets: AssetsConfig,
    pub supabase: SupabaseConfig,
    pub notify: NotifyConfig,
    pub features: FeatureFlags,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// CORS policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
    #[serde(default = "default_allow_methods")]
    pub allow_methods: String,
    #[serde(default = "default_allow_headers")]
    pub allow_headers: String,
    #[serde(default = "default_max_age")]
    pub max_age_secs: u32,
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_allow_methods() -> String {
    "GET, POST, PUT, DELETE, OPTIONS".to_string()
}

fn default_allow_headers() -> String {
    "Content-Type, Authorization, X-Client-Info".to_string()
}

fn default_max_age() -> u32 {
    86400
}

/// Static asset serving configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Directory holding the SPA build artifacts
    #[serde(default = "default_assets_dir")]
    pub dir: String,
    /// HTML entry document served for client-side routes
    #[serde(default = "default_index_file")]
    pub index_file: String,
    #[serde(default = "default_icon_cache")]
    pub icon_cache_secs: u32,
}

fn default_assets_dir() -> String {
    "./dist".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_icon_cache() -> u32 {
    86400
}

/// External Supabase (Postgres + Auth) service configuration.
///
/// Empty values are tolerated at startup; handlers degrade to explicit
/// error responses when the service is unconfigured.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    /// Key used for REST and auth calls
    #[serde(default)]
    pub api_key: String,
    /// Publishable key exposed to the SPA via /api/config; falls back to
    /// `api_key` when unset
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10000
}

impl SupabaseConfig {
    /// Key safe to hand to the browser
    pub fn public_key(&self) -> &str {
        self.anon_key.as_deref().unwrap_or(&self.api_key)
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

/// Outbound notification webhook configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NotifyConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_notify_timeout")]
    pub timeout_ms: u64,
}

fn default_notify_timeout() -> u64 {
    5000
}

/// Feature enable flags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub blog: bool,
    #[serde(default = "default_true")]
    pub appointments: bool,
    #[serde(default = "default_true")]
    pub contact: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            blog: true,
            appointments: true,
            contact: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from the default configuration file and environment
    /// variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/gateway.yaml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("cors.allow_origin", "*")?
            .set_default("cors.allow_methods", "GET, POST, PUT, DELETE, OPTIONS")?
            .set_default("cors.allow_headers", "Content-Type, Authorization, X-Client-Info")?
            .set_default("cors.max_age_secs", 86400)?
            .set_default("assets.dir", "./dist")?
            .set_default("assets.index_file", "index.html")?
            .set_default("assets.icon_cache_secs", 86400)?
            .set_default("supabase.url", "")?
            .set_default("supabase.api_key", "")?
            .set_default("supabase.timeout_ms", 10000)?
            .set_default("notify.timeout_ms", 5000)?
            .set_default("features.blog", true)?
            .set_default("features.appointments", true)?
            .set_default("features.contact", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix("PORTAL_EDGE")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )
            .into());
        }

        if self.cors.allow_origin.is_empty() {
            return Err(config::ConfigError::Message(
                "CORS allow_origin cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            cors: CorsConfig {
                allow_origin: default_allow_origin(),
                allow_methods: default_allow_methods(),
                allow_headers: default_allow_headers(),
                max_age_secs: default_max_age(),
            },
            assets: AssetsConfig {
                dir: default_assets_dir(),
                index_file: default_index_file(),
                icon_cache_secs: default_icon_cache(),
            },
            supabase: SupabaseConfig {
                url: String::new(),
                api_key: String::new(),
                anon_key: None,
                timeout_ms: default_timeout_ms(),
            },
            notify: NotifyConfig::default(),
            features: FeatureFlags::default(),
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cors.allow_origin, "*");
        assert!(settings.features.blog);
        assert!(!settings.supabase.is_configured());
    }

    #[test]
    fn test_public_key_falls_back_to_api_key() {
        let mut supabase = Settings::default().supabase;
        supabase.api_key = "service-key".to_string();
        assert_eq!(supabase.public_key(), "service-key");

        supabase.anon_key = Some("anon-key".to_string());
        assert_eq!(supabase.public_key(), "anon-key");
    }

    #[test]
    fn test_validate_rejects_empty_origin() {
        let mut settings = Settings::default();
        settings.cors.allow_origin = String::new();
        assert!(settings.validate().is_err());
    }
}
