//! TOML configuration for the gateway daemon
//!
//! ```toml
//! [server]
//! port = 5000
//! log_format = "json"
//!
//! [auth]
//! jwt_secret = "shared-with-the-auth-service"
//! issuer = "TravelPlannerAPI"
//! audience = "TravelPlannerClients"
//! # token = "static-token-instead-of-jwt"
//!
//! [gateway]
//! timeout_ms = 5000
//! connect_timeout_ms = 2000
//!
//! [[backend]]
//! kind = "train"
//! url = "http://localhost:49892"
//! ```
//!
//! Every section is optional. With no `[[backend]]` entries the daemon binds
//! train, bus and flight to their conventional local ports.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use travel_api::{AuthPolicy, JwtSettings};
use travel_core::{BackendDescriptor, BackendKind, BackendRegistry, RegistryError};
use travel_gateway::DEFAULT_CALL_TIMEOUT;

/// Default listen port
const DEFAULT_PORT: u16 = 5000;
/// Default connection timeout for provider calls
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;
/// Signing key the auth service uses when none is configured
pub const DEFAULT_JWT_SECRET: &str = "YourSuperSecretKeyForJWTTokenGeneration123!";
const DEFAULT_ISSUER: &str = "TravelPlannerAPI";
const DEFAULT_AUDIENCE: &str = "TravelPlannerClients";

/// Conventional local address of each provider service
fn default_url(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::Train => "http://localhost:49892",
        BackendKind::Bus => "http://localhost:49893",
        BackendKind::Flight => "http://localhost:49889",
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Static bearer token; replaces JWT verification when set
    pub token: Option<String>,
    /// HS256 key shared with the auth service
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }
}

impl AuthConfig {
    /// Which bearer tokens the API accepts
    pub fn policy(&self) -> AuthPolicy {
        match &self.token {
            Some(token) => AuthPolicy::static_token(token.clone()),
            None => AuthPolicy::jwt(&JwtSettings {
                secret: self.jwt_secret.clone(),
                issuer: self.issuer.clone(),
                audience: self.audience.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on one backend call, in milliseconds
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_CALL_TIMEOUT.as_millis() as u64,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: String,
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gateway: TimeoutConfig,
    #[serde(default, rename = "backend")]
    pub backends: Vec<BackendConfig>,
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "gateway.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.gateway.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "gateway.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if matches!(&self.auth.token, Some(t) if t.trim().is_empty()) {
            return Err(ConfigError::Invalid("auth.token must not be empty".to_string()));
        }
        for (key, value) in [
            ("auth.jwt_secret", &self.auth.jwt_secret),
            ("auth.issuer", &self.auth.issuer),
            ("auth.audience", &self.auth.audience),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }
        self.registry()?;
        Ok(())
    }

    /// Build the backend registry, falling back to the default local bindings
    pub fn registry(&self) -> Result<BackendRegistry, ConfigError> {
        let descriptors = if self.backends.is_empty() {
            BackendKind::ALL
                .into_iter()
                .map(|kind| BackendDescriptor::new(kind, default_url(kind)))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.backends
                .iter()
                .map(|b| BackendDescriptor::new(b.kind, &b.url))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(BackendRegistry::new(descriptors)?)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.connect_timeout_ms)
    }
}
