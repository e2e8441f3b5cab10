use std::env;
use std::fmt;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 20;
/// One year.
const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Raised when an environment variable is missing or cannot be parsed.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings shared by the three service binaries.
///
/// The catalog services only read the server address; `todos` also needs the
/// database URL and the token settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    /// Wraps the todo routes in the bearer-token gate.
    pub require_auth: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so callers other than
    /// `from_env` never have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret: lookup("JWT_SECRET").filter(|secret| !secret.is_empty()),
            token_ttl_minutes: token_ttl_minutes(&lookup)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            require_auth: parse_or(&lookup, "REQUIRE_AUTH", false)?,
        })
    }

    /// The signing secret; only the todo service insists on it.
    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret.as_deref().ok_or(ConfigError::Missing("JWT_SECRET"))
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Tokens must outlive the request that issued them, and the lifetime has to fit
/// in a `chrono::Duration`.
fn token_ttl_minutes<F>(lookup: &F) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let minutes = parse_or(lookup, "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
    if (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ConfigError::Invalid {
            key: "TOKEN_TTL_MINUTES",
            value: minutes.to_string(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
