use carlot_auth_types::token::DEFAULT_SESSION_TTL_SECS;

use crate::domain::types::DEFAULT_AUTHCODE_TTL_SECS;

const DEFAULT_API_PORT: u16 = 8000;
const DEFAULT_SMTP_PORT: u16 = 587;

/// Upper bound for session and code lifetimes (30 days).
pub const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
    #[error("unknown MAILER {0:?} (expected \"smtp\" or \"log\")")]
    UnknownMailer(String),
}

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Required, no fallback.
    pub jwt_secret: String,
    /// Session token lifetime (default 300). Env var: `SESSION_TTL_SECS`.
    pub session_ttl_secs: i64,
    /// Login code lifetime (default 900). Env var: `AUTHCODE_TTL_SECS`.
    pub code_ttl_secs: i64,
    /// TCP port to listen on (default 8000). Env var: `API_PORT`.
    pub api_port: u16,
    pub mailer: MailerConfig,
}

/// How login codes reach the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailerConfig {
    /// Log the code instead of sending it. Development only.
    Log,
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        from: String,
    },
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let session_ttl_secs = parse_or(&get, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        let code_ttl_secs = parse_or(&get, "AUTHCODE_TTL_SECS", DEFAULT_AUTHCODE_TTL_SECS)?;
        for (var, secs) in [
            ("SESSION_TTL_SECS", session_ttl_secs),
            ("AUTHCODE_TTL_SECS", code_ttl_secs),
        ] {
            if !(1..=MAX_TTL_SECS).contains(&secs) {
                return Err(ConfigError::Invalid {
                    var,
                    value: secs.to_string(),
                });
            }
        }
        let api_port = parse_or(&get, "API_PORT", DEFAULT_API_PORT)?;

        let mailer = match get("MAILER").as_deref().unwrap_or("smtp") {
            "log" => MailerConfig::Log,
            "smtp" => MailerConfig::Smtp {
                host: required("SMTP_HOST")?,
                port: parse_or(&get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                from: required("SMTP_FROM")?,
            },
            other => return Err(ConfigError::UnknownMailer(other.to_owned())),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            session_ttl_secs,
            code_ttl_secs,
            api_port,
            mailer,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
