use common::config::RegistryConfig;
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
    /// Static bearer token required on every `/api` route.
    pub api_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Maximum accepted upload body in bytes. Default: 16 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_max_upload_size() -> usize {
    16 * 1024 * 1024
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_size: default_max_upload_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Seed the sample VIN and its image on startup. Default: true.
    #[serde(default = "default_seed_sample_data")]
    pub sample_data: bool,
}

fn default_seed_sample_data() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            sample_data: default_seed_sample_data(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.api_token", "devtoken")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., VINDEX__DATABASE__URL)
            .add_source(
                Environment::with_prefix("VINDEX")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.url.starts_with("postgres") {
            return Err(ConfigError::Message(
                "database.url must be a PostgreSQL URL (postgres://...)".into(),
            ));
        }
        if self.auth.api_token.trim().is_empty() {
            return Err(ConfigError::Message("auth.api_token must not be empty".into()));
        }
        Ok(())
    }
}
