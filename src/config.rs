use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Session secret used when `SECRET_KEY` is unset. Must be overridden in production.
pub const DEFAULT_SECRET_KEY: &str = "dev-change-me";

/// Admin password used when `ADMIN_PASSWORD` is unset. Must be overridden in production.
pub const DEFAULT_ADMIN_PASSWORD: &str = "change-this";

/// Longest accepted admin session lifetime: ten years.
pub const MAX_SESSION_TTL_HOURS: u64 = 10 * 365 * 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    // Site
    pub site_name: String,

    // Auth
    pub secret_key: String,
    pub admin_password: String,
    pub session_ttl: Duration,
    pub secure_cookies: bool,

    // Storage
    pub database_path: PathBuf,
    pub posts_path: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("site_name", &self.site_name)
            .field("secret_key", &"<redacted>")
            .field("admin_password", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("secure_cookies", &self.secure_cookies)
            .field("database_path", &self.database_path)
            .field("posts_path", &self.posts_path)
            .field("static_dir", &self.static_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default, so this only fails on unparsable values.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean environment variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Site
            site_name: env_or_default("SITE_NAME", "Khamsa Travels"),

            // Auth
            secret_key: env_or_default("SECRET_KEY", DEFAULT_SECRET_KEY),
            admin_password: env_or_default("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            session_ttl: Duration::from_secs(
                parse_env_u64("SESSION_TTL_HOURS", 24)?
                    .checked_mul(3600)
                    .ok_or_else(|| too_large("SESSION_TTL_HOURS"))?,
            ),
            secure_cookies: parse_env_bool("SECURE_COOKIES", false)?,

            // Storage
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/blog.sqlite")),
            posts_path: PathBuf::from(env_or_default("POSTS_PATH", "./data/posts.json")),
            static_dir: PathBuf::from(env_or_default("STATIC_DIR", "./static")),
            max_upload_bytes: parse_env_usize("MAX_UPLOAD_MB", 16)?
                .checked_mul(1024 * 1024)
                .ok_or_else(|| too_large("MAX_UPLOAD_MB"))?,

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 5000)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "SECRET_KEY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.admin_password.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "ADMIN_PASSWORD".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_HOURS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.session_ttl > Duration::from_secs(MAX_SESSION_TTL_HOURS * 3600) {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_HOURS".to_string(),
                message: format!("must be at most {MAX_SESSION_TTL_HOURS}"),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_UPLOAD_MB".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Names of secrets still set to their built-in development defaults.
    #[must_use]
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.secret_key == DEFAULT_SECRET_KEY {
            names.push("SECRET_KEY");
        }
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            names.push("ADMIN_PASSWORD");
        }
        names
    }

    /// Directory that receives uploaded cover images.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}

fn too_large(name: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: "value is too large".to_string(),
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
