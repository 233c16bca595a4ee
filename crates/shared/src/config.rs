//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// URL scheme selecting the in-process store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL, or `memory://` for the in-process store.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Returns true when the configured URL selects the in-process store.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config files and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// How long a login may reuse a previously issued token, in seconds.
    #[serde(default = "default_token_cache")]
    pub token_cache_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_token_cache() -> u64 {
    300 // 5 minutes
}

/// Shortest accepted access token lifetime, in seconds.
pub const MIN_ACCESS_TOKEN_EXPIRY_SECS: u64 = 60;

impl JwtSettings {
    /// Checks that the token lifetimes are usable together.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if the access token lifetime is below
    /// [`MIN_ACCESS_TOKEN_EXPIRY_SECS`] or the token cache outlives it.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.access_token_expiry_secs < MIN_ACCESS_TOKEN_EXPIRY_SECS {
            return Err(config::ConfigError::Message(format!(
                "jwt.access_token_expiry_secs must be at least {MIN_ACCESS_TOKEN_EXPIRY_SECS}, got {}",
                self.access_token_expiry_secs
            )));
        }
        if self.token_cache_secs >= self.access_token_expiry_secs {
            return Err(config::ConfigError::Message(format!(
                "jwt.token_cache_secs ({}) must be below jwt.access_token_expiry_secs ({})",
                self.token_cache_secs, self.access_token_expiry_secs
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `BANKLY__SECTION__KEY`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the JWT
    /// lifetimes fail [`JwtSettings::validate`].
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BANKLY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.jwt.validate()?;
        Ok(config)
    }
}
