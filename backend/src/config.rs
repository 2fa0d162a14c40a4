//! Process configuration read from the environment.
//!
//! | Variable                | Default                      |
//! |-------------------------|------------------------------|
//! | `APP_ENV`               | `development`                |
//! | `HOST`                  | `0.0.0.0`                    |
//! | `PORT`                  | `3000`                       |
//! | `LOG_LEVEL`             | `info`                       |
//! | `AUTH_USERS`            | `admin:password,user:secret` |
//! | `MEMORY_THRESHOLD_MB`   | `100`                        |
//! | `SHUTDOWN_TIMEOUT_SECS` | `30`                         |
//!
//! Unset and empty variables take their default. Present but unparsable
//! values are rejected with [`ConfigError::InvalidEnv`].

use std::fmt;
use std::str::FromStr;

use mockable::Env;

use crate::domain::Credentials;
use crate::outbound::system::DEFAULT_MEMORY_THRESHOLD_MB;

pub const APP_ENV_ENV: &str = "APP_ENV";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const AUTH_USERS_ENV: &str = "AUTH_USERS";
pub const MEMORY_THRESHOLD_ENV: &str = "MEMORY_THRESHOLD_MB";
pub const SHUTDOWN_TIMEOUT_ENV: &str = "SHUTDOWN_TIMEOUT_SECS";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_AUTH_USERS: &str = "admin:password,user:secret";
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

const APP_ENV_EXPECTED: &str = "development|production|test";
const PORT_EXPECTED: &str = "an integer between 0 and 65535";
const INTEGER_EXPECTED: &str = "a non-negative integer";
const AUTH_USERS_EXPECTED: &str = "comma-separated username:password pairs";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub env: AppEnv,
    pub host: String,
    pub port: u16,
    /// `EnvFilter` directive for the tracing subscriber.
    pub log_level: String,
    /// Accounts accepted by the Basic auth middleware.
    pub auth_users: Vec<Credentials>,
    pub memory_threshold_mb: u64,
    pub shutdown_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: AppEnv::default(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            auth_users: parse_auth_users(DEFAULT_AUTH_USERS).unwrap_or_default(),
            memory_threshold_mb: DEFAULT_MEMORY_THRESHOLD_MB,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Read configuration from `env`.
    ///
    /// # Examples
    /// ```
    /// use mockable::MockEnv;
    /// use sprint_zero::config::AppConfig;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|key| match key {
    ///     "PORT" => Some("8080".into()),
    ///     _ => None,
    /// });
    /// let config = AppConfig::from_env(&env).expect("valid configuration");
    /// assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    /// ```
    pub fn from_env(env: &impl Env) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let app_env = match read(env, APP_ENV_ENV) {
            Some(value) => value.parse().map_err(|()| invalid(APP_ENV_ENV, value, APP_ENV_EXPECTED))?,
            None => defaults.env,
        };
        let port = match read(env, PORT_ENV) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| invalid(PORT_ENV, value, PORT_EXPECTED))?,
            None => defaults.port,
        };
        let auth_users = match read(env, AUTH_USERS_ENV) {
            Some(value) => parse_auth_users(&value)
                .ok_or_else(|| invalid(AUTH_USERS_ENV, "<redacted>", AUTH_USERS_EXPECTED))?,
            None => defaults.auth_users,
        };

        Ok(Self {
            env: app_env,
            host: read(env, HOST_ENV).unwrap_or(defaults.host),
            port,
            log_level: read(env, LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            auth_users,
            memory_threshold_mb: read_u64(env, MEMORY_THRESHOLD_ENV, defaults.memory_threshold_mb)?,
            shutdown_timeout_secs: read_u64(
                env,
                SHUTDOWN_TIMEOUT_ENV,
                defaults.shutdown_timeout_secs,
            )?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.env == AppEnv::Development
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnv::Production
    }

    pub fn is_test(&self) -> bool {
        self.env == AppEnv::Test
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read(env: &impl Env, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.is_empty())
}

fn read_u64(env: &impl Env, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match read(env, name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid(name, value, INTEGER_EXPECTED)),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, value: impl Into<String>, expected: &'static str) -> ConfigError {
    ConfigError::InvalidEnv {
        name,
        value: value.into(),
        expected,
    }
}

fn parse_auth_users(raw: &str) -> Option<Vec<Credentials>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| Credentials::from_pair(pair).ok())
        .collect()
}
