use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

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
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlogConfig {
    /// When true, `GET /api/posts/slug/{slug}` returns any post regardless
    /// of status, reproducing the legacy behavior where drafts are reachable
    /// by anyone who knows the slug. Off by default: the lookup then applies
    /// the caller's visibility tier.
    pub public_slug_lookup: bool,
}

/// Optional bootstrap admin account, created at startup when absent.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: mailer::MailerConfig,
    pub blog: BlogConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = mailer::MailerConfig::default();
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("email.api_key", "")?
            .set_default("email.base_url", defaults.base_url)?
            .set_default("email.from_address", defaults.from_address)?
            .set_default("email.admin_address", defaults.admin_address)?
            .set_default("blog.public_slug_lookup", false)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., TRENDBASE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("TRENDBASE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
