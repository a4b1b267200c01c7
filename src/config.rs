use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub verification: VerificationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Lifetime of a session token. Rotation issues a fresh full TTL.
    pub ttl_hours: i64,
}

/// DigiLocker-style identity verification provider.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VerificationConfig {
    pub base_url: String,
    pub company_name: String,
    pub secret_token: String,
    pub callback_url: String,
    /// Frontend page to redirect to after a successful callback. Empty means
    /// respond with JSON instead of redirecting.
    pub success_url: String,
    /// How long a pending verification state stays claimable.
    pub pending_ttl_seconds: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/lenslink_db".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://digilocker.example.com".to_string(),
            company_name: String::new(),
            secret_token: String::new(),
            callback_url: String::new(),
            success_url: String::new(),
            pending_ttl_seconds: 900,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            verification: VerificationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Lenslink.toml (base configuration file)
    /// 2. Environment variables (prefixed with LENSLINK_)
    /// 3. DATABASE_URL environment variable (for backwards compatibility)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            .merge(Toml::file("Lenslink.toml").nested())
            .merge(Env::prefixed("LENSLINK_").split("_"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_a_day_long_session_ttl() {
        let config = Config::default();
        assert_eq!(config.session.ttl_hours, 24);
    }

    #[test]
    fn defaults_serialize_back_to_toml() {
        // Config::load seeds figment with the serialized defaults, so they
        // must round-trip cleanly.
        let toml = toml::to_string(&Config::default()).expect("serializable defaults");
        assert!(toml.contains("ttl_hours"));
        assert!(toml.contains("base_path"));
    }
}
