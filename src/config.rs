//! Runtime configuration read from the process environment.
//!
//! `main` loads `.env` with `dotenvy` first, so every value can live either in
//! the environment or in that file.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;
const DEFAULT_STORAGE_ROOT: &str = "./storage";
const DEFAULT_STORAGE_BUCKET: &str = "product-images";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_WHATSAPP_NUMBER: &str = "573102746181";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Value of `APP_ENV`; `development` exposes error details in responses.
    pub app_env: String,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Directory with the built single-page application, served at `/`.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthConfig {
    /// HMAC secret signing admin tokens.
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub bucket: String,
    /// Origin prepended to object URLs handed out to clients.
    pub public_base_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MailConfig {
    /// Relay settings; `None` logs emails instead of sending them.
    pub smtp: Option<SmtpConfig>,
    pub from_address: String,
    pub recipient: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutConfig {
    /// Phone number (digits only, with country code) receiving orders.
    pub whatsapp_number: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub checkout: CheckoutConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|origins| split_list(&origins))
            .unwrap_or_default();
        if let Some(origin) = allowed_origins
            .iter()
            .find(|origin| !origin.starts_with("http://") && !origin.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                message: format!("`{origin}` is not an http(s) origin"),
            });
        }

        let address = var("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let port = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;

        let server = ServerConfig {
            address: address.clone(),
            port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            app_env: var("APP_ENV").unwrap_or_else(|| "production".to_string()),
            allowed_origins,
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        };

        let token_ttl_seconds = parse_or(
            "TOKEN_TTL_SECONDS",
            var("TOKEN_TTL_SECONDS"),
            DEFAULT_TOKEN_TTL_SECONDS,
        )?;
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECONDS",
                message: "must be positive".to_string(),
            });
        }

        let auth = AuthConfig {
            jwt_secret: var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_seconds,
        };

        let storage = StorageConfig {
            root: PathBuf::from(
                var("STORAGE_ROOT").unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string()),
            ),
            bucket: var("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
            public_base_url: var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://{address}:{port}")),
        };

        let smtp = match (var("EMAIL_HOST"), var("EMAIL_USER"), var("EMAIL_PASS")) {
            (Some(host), Some(user), Some(password)) => Some(SmtpConfig {
                host,
                port: parse_or("EMAIL_PORT", var("EMAIL_PORT"), DEFAULT_SMTP_PORT)?,
                user,
                password,
            }),
            _ => None,
        };
        let from_address = var("EMAIL_USER").unwrap_or_else(|| "no-reply@localhost".to_string());
        let mail = MailConfig {
            smtp,
            recipient: var("RECIPIENT_EMAIL").unwrap_or_else(|| from_address.clone()),
            from_address,
        };

        let whatsapp_number: String = var("WHATSAPP_NUMBER")
            .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string())
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if whatsapp_number.is_empty() {
            return Err(ConfigError::Invalid {
                key: "WHATSAPP_NUMBER",
                message: "must contain digits".to_string(),
            });
        }

        Ok(Self {
            server,
            auth,
            storage,
            mail,
            checkout: CheckoutConfig { whatsapp_number },
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            message: err.to_string(),
        }),
        None => {
            log::info!("{key} not set, using default");
            Ok(default)
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
