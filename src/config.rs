// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup into a
//! [`Settings`] value that is then passed to everything that needs it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 shared secret (at least 32 bytes) | Required |
//! | `JWT_TTL_SECS` | Access token lifetime in seconds, at most 30 days | `3600` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance on expiry, at most 300 | `0` |
//! | `OPEN_ENDPOINTS` | Comma-separated paths exempt from token checks | see [`DEFAULT_OPEN_ENDPOINTS`] |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json`, `pretty` or `compact`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_EMAIL` | Bootstrap admin account email | Optional |
//! | `SEED_ADMIN_PASSWORD` | Bootstrap admin account password | Optional |

use std::fmt;

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};

use crate::logging::LogFormat;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
pub const JWT_LEEWAY_SECS_ENV: &str = "JWT_LEEWAY_SECS";
pub const OPEN_ENDPOINTS_ENV: &str = "OPEN_ENDPOINTS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// HS256 keys shorter than the hash output are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Upper bound on `JWT_TTL_SECS` (30 days).
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Upper bound on `JWT_LEEWAY_SECS`.
pub const MAX_LEEWAY_SECS: i64 = 300;

/// Registration, login, health probes and API docs.
pub const DEFAULT_OPEN_ENDPOINTS: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/health/**",
    "/docs/**",
    "/api-doc/**",
];

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("JWT_SECRET must be at least 32 bytes")]
    WeakSecret,
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Credentials for an admin account created at startup.
pub struct SeedAdmin {
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Process-wide settings, built once and never mutated.
#[derive(Debug)]
pub struct Settings {
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
    pub leeway: Duration,
    pub open_endpoints: Vec<String>,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub seed_admin: Option<SeedAdmin>,
}

impl Settings {
    /// Defaults for everything except the secret.
    pub fn with_secret(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret);
        }

        Ok(Self {
            jwt_secret: SecretString::from(secret),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            leeway: Duration::zero(),
            open_endpoints: DEFAULT_OPEN_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_format: LogFormat::default(),
            seed_admin: None,
        })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let mut settings = Self::with_secret(secret)?;

        if let Some(raw) = lookup(JWT_TTL_SECS_ENV) {
            settings.token_ttl =
                parse_bounded_secs(JWT_TTL_SECS_ENV, &raw, 1, MAX_TOKEN_TTL_SECS)?;
        }

        if let Some(raw) = lookup(JWT_LEEWAY_SECS_ENV) {
            settings.leeway = parse_bounded_secs(JWT_LEEWAY_SECS_ENV, &raw, 0, MAX_LEEWAY_SECS)?;
        }

        if let Some(raw) = lookup(OPEN_ENDPOINTS_ENV) {
            settings.open_endpoints = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(host) = lookup(HOST_ENV) {
            settings.host = host;
        }

        if let Some(raw) = lookup(PORT_ENV) {
            settings.port = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                reason: format!("'{raw}' is not a port number"),
            })?;
        }

        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            settings.log_format = raw.parse().map_err(|reason| ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                reason,
            })?;
        }

        settings.seed_admin = match (lookup(SEED_ADMIN_EMAIL_ENV), lookup(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAdmin {
                email,
                password: SecretString::from(password),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_ADMIN_EMAIL_ENV)),
        };

        Ok(settings)
    }

    /// Raw secret bytes for the token codec.
    pub fn secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        match Self::with_secret("test-secret-key-for-jwt-testing-minimum-32-chars") {
            Ok(settings) => settings,
            Err(e) => panic!("test settings: {e}"),
        }
    }
}

/// Parse a whole number of seconds within `min..=max`.
fn parse_bounded_secs(
    name: &'static str,
    raw: &str,
    min: i64,
    max: i64,
) -> Result<Duration, ConfigError> {
    let secs: i64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("'{raw}' is not a whole number of seconds"),
    })?;

    if !(min..=max).contains(&secs) {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("must be between {min} and {max} seconds"),
        });
    }

    Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
        name,
        reason: format!("'{raw}' is out of range"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "too-short")]),
            Err(ConfigError::WeakSecret)
        ));
    }

    #[test]
    fn defaults_apply() {
        let settings = load(&[(JWT_SECRET_ENV, SECRET)]).unwrap();
        assert_eq!(settings.token_ttl, Duration::seconds(3600));
        assert_eq!(settings.leeway, Duration::zero());
        assert_eq!(settings.port, 8080);
        assert!(settings
            .open_endpoints
            .contains(&"/api/auth/login".to_string()));
        assert!(settings.seed_admin.is_none());
        assert_eq!(settings.secret_bytes(), SECRET.as_bytes());
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = load(&[
            (JWT_SECRET_ENV, SECRET),
            (JWT_TTL_SECS_ENV, "600"),
            (JWT_LEEWAY_SECS_ENV, "30"),
            (OPEN_ENDPOINTS_ENV, "/a, /b/** ,"),
            (PORT_ENV, "9090"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(settings.token_ttl, Duration::seconds(600));
        assert_eq!(settings.leeway, Duration::seconds(30));
        assert_eq!(settings.open_endpoints, vec!["/a", "/b/**"]);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn non_positive_ttl_is_invalid() {
        let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_TTL_SECS_ENV, "0")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: JWT_TTL_SECS_ENV, .. })));

        let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_TTL_SECS_ENV, "soon")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: JWT_TTL_SECS_ENV, .. })));
    }

    #[test]
    fn oversized_durations_are_invalid() {
        for ttl in ["100000000000000", "9223372036854775807", "2592001"] {
            let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_TTL_SECS_ENV, ttl)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: JWT_TTL_SECS_ENV, .. })),
                "{ttl} should be rejected"
            );
        }

        let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_TTL_SECS_ENV, "2592000")]);
        assert_eq!(result.unwrap().token_ttl, Duration::days(30));

        let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_LEEWAY_SECS_ENV, "9223372036854775807")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: JWT_LEEWAY_SECS_ENV, .. })));

        let result = load(&[(JWT_SECRET_ENV, SECRET), (JWT_LEEWAY_SECS_ENV, "-1")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: JWT_LEEWAY_SECS_ENV, .. })));
    }

    #[test]
    fn seed_admin_needs_both_values() {
        let result = load(&[(JWT_SECRET_ENV, SECRET), (SEED_ADMIN_EMAIL_ENV, "root@example.com")]);
        assert!(matches!(result, Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV))));

        let settings = load(&[
            (JWT_SECRET_ENV, SECRET),
            (SEED_ADMIN_EMAIL_ENV, "root@example.com"),
            (SEED_ADMIN_PASSWORD_ENV, "changeme"),
        ])
        .unwrap();
        assert_eq!(settings.seed_admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn debug_output_hides_secret() {
        let settings = load(&[(JWT_SECRET_ENV, SECRET)]).unwrap();
        assert!(!format!("{settings:?}").contains(SECRET));
    }
}
