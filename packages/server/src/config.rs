use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::StorageAppConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Log every SQL statement at debug level.
    #[serde(default)]
    pub log_sql: bool,
}

fn default_max_connections() -> u32 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in hours. Default: 168 (7 days).
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Whether `POST /auth/register` creates contestant accounts.
    /// Default: false (accounts are created by administrators).
    #[serde(default)]
    pub allow_registration: bool,
    /// Frontend base URL used to build password reset links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_token_ttl_hours() -> i64 {
    168
}
fn default_public_url() -> String {
    "http://127.0.0.1:3000".into()
}

/// A fixed-window budget: at most `points` hits per `window_secs`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LimitConfig {
    pub points: u32,
    pub window_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_login_limit")]
    pub login: LimitConfig,
    #[serde(default = "default_register_limit")]
    pub register: LimitConfig,
    #[serde(default = "default_register_limit")]
    pub forgot_password: LimitConfig,
}

fn default_login_limit() -> LimitConfig {
    LimitConfig {
        points: 5,
        window_secs: 60,
    }
}
fn default_register_limit() -> LimitConfig {
    LimitConfig {
        points: 3,
        window_secs: 3600,
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: default_login_limit(),
            register: default_register_limit(),
            forgot_password: default_register_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// When false, password reset links are returned to the caller instead
    /// of being delivered.
    #[serde(default)]
    pub enabled: bool,
    /// Sender address shown on outgoing mail.
    #[serde(default = "default_mail_from")]
    pub from: String,
}

fn default_mail_from() -> String {
    "concurso@example.org".into()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from: default_mail_from(),
        }
    }
}

/// Bootstrap administrator created on first start.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageAppConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub mail: MailConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("seed.admin_name", "Administrador")?
            .set_default("seed.admin_email", "admin@example.org")?
            .set_default("seed.admin_password", "change-me-now")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CONTEST__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CONTEST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
