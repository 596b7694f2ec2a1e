use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use url::Url;
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    /// Comma separated list of origins.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    // ───── Uploads ─────
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: usize,

    #[serde(default = "default_resume_max_bytes")]
    pub resume_max_bytes: usize,

    #[serde(default = "default_json_body_limit")]
    pub json_body_limit: usize,

    #[serde(default)]
    pub s3_bucket: Option<String>,

    #[serde(default = "default_s3_region")]
    pub s3_region: String,

    #[serde(default)]
    pub s3_endpoint: Option<String>,

    #[serde(default)]
    pub s3_public_base_url: Option<String>,

    // ───── Mail ─────
    #[serde(default)]
    pub mail_api_url: Option<String>,

    #[serde(default)]
    pub mail_api_key: Option<String>,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    // ───── Rate limiting ─────
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u64,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default)]
    pub trust_proxy: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-CMS".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> String {
    "http://localhost:3000".to_string()
}
fn default_jwt_expiration() -> i64 {
    1440
}
fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_storage_backend() -> StorageBackend {
    StorageBackend::Local
}
fn default_upload_dir() -> String {
    "uploads".to_string()
}
fn default_upload_max_bytes() -> usize {
    5 * 1024 * 1024
}
fn default_resume_max_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_json_body_limit() -> usize {
    10 * 1024 * 1024
}
fn default_s3_region() -> String {
    "us-east-1".to_string()
}
fn default_mail_from() -> String {
    "no-reply@localhost".to_string()
}
fn default_rate_limit_max_requests() -> u64 {
    1000
}
fn default_rate_limit_window_secs() -> u64 {
    900
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "JWT_SECRET")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.jwt_expiration_minutes <= 0 {
            errors.push("JWT_EXPIRATION_MINUTES must be positive");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.storage_backend == StorageBackend::S3
            && self.s3_bucket.as_deref().map_or(true, |b| b.trim().is_empty())
        {
            errors.push("S3_BUCKET must be set when STORAGE_BACKEND is s3");
        }
        if self.rate_limit_max_requests == 0 || self.rate_limit_window_secs == 0 {
            errors.push("Rate limit values must be positive");
        }
        if !is_http_url(&self.frontend_url) {
            errors.push("FRONTEND_URL must be an absolute http(s) URL");
        }
        if self.mail_api_url.as_deref().is_some_and(|u| !is_http_url(u)) {
            errors.push("MAIL_API_URL must be an absolute http(s) URL");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Falls back to the bare env key, then the `APP_` prefixed one.
fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if !current.trim().is_empty() {
        return Ok(current);
    }
    env::var(env_key)
        .or_else(|_| env::var(format!("APP_{env_key}")))
        .map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("frontend_url", &self.frontend_url)
            .field("storage_backend", &self.storage_backend)
            .field("upload_dir", &self.upload_dir)
            .field("upload_max_bytes", &self.upload_max_bytes)
            .field("resume_max_bytes", &self.resume_max_bytes)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("mail_api_url", &self.mail_api_url)
            .field("mail_api_key", &self.mail_api_key.as_ref().map(|k| k.redact()))
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio CMS Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_test".to_string(),
        cors_allowed_origins: "*".to_string(),
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".to_string(),
        jwt_expiration_minutes: 60,
        frontend_url: "http://localhost:3000".to_string(),
        storage_backend: StorageBackend::Local,
        upload_dir: "uploads".to_string(),
        upload_max_bytes: default_upload_max_bytes(),
        resume_max_bytes: default_resume_max_bytes(),
        json_body_limit: default_json_body_limit(),
        s3_bucket: None,
        s3_region: default_s3_region(),
        s3_endpoint: None,
        s3_public_base_url: None,
        mail_api_url: None,
        mail_api_key: None,
        mail_from: default_mail_from(),
        rate_limit_max_requests: 1000,
        rate_limit_window_secs: 900,
        trust_proxy: false,
    }
}
