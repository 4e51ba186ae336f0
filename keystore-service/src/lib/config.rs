use std::env;
use std::fmt;

use auth::Argon2Params;
use auth::AuthenticatorConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hasher: HasherConfig,
    pub encryption: EncryptionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_lifetime_minutes: i64,
    pub refresh: RefreshTokenConfig,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field(
                "access_token_lifetime_minutes",
                &self.access_token_lifetime_minutes,
            )
            .field("refresh", &self.refresh)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshTokenConfig {
    pub lifetime_hours: i64,
    /// Random bytes per refresh secret
    pub length: usize,
}

/// Argon2id costs for new hashes. Existing hashes keep the costs they were created with.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HasherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub output_len: usize,
    pub salt_len: usize,
}

impl Default for HasherConfig {
    fn default() -> Self {
        let params = Argon2Params::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
            output_len: params.output_len,
            salt_len: params.salt_len,
        }
    }
}

impl From<&HasherConfig> for Argon2Params {
    fn from(config: &HasherConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
            output_len: config.output_len,
            salt_len: config.salt_len,
        }
    }
}

/// Static per-category keys for sensitive object fields.
///
/// Key bytes are the UTF-8 bytes of the configured strings; lengths are checked at startup and on every use.
#[derive(Deserialize, Clone)]
pub struct EncryptionConfig {
    pub account_obj_key: String,
    pub bank_card_obj_key: String,
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("account_obj_key", &"<redacted>")
            .field("bank_card_obj_key", &"<redacted>")
            .finish()
    }
}

/// Unprefixed variables, `__` between path segments.
///
/// `JWT__SECRET` overrides `jwt.secret`, `JWT__REFRESH__LENGTH` overrides `jwt.refresh.length`.
fn environment() -> Environment {
    Environment::default().separator("__")
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment())
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Settings for the token and hashing coordinator.
    pub fn authenticator(&self) -> AuthenticatorConfig {
        AuthenticatorConfig {
            jwt_secret: self.jwt.secret.as_bytes().to_vec(),
            issuer: self.jwt.issuer.clone(),
            access_token_lifetime: chrono::Duration::minutes(self.jwt.access_token_lifetime_minutes),
            refresh_token_lifetime: chrono::Duration::hours(self.jwt.refresh.lifetime_hours),
            refresh_token_length: self.jwt.refresh.length,
            hasher_params: Argon2Params::from(&self.hasher),
        }
    }
}
