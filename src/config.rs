// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and
//! the token settings loaded once at startup. There is no hot reload:
//! changing the signing secret or validity requires a restart, and a
//! changed secret invalidates every token already in circulation.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for user records and audit logs | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Base64-encoded HS512 signing secret (>= 64 bytes decoded) | Required |
//! | `JWT_TOKEN_VALIDITY_SECONDS` | Token lifetime in seconds (must be positive) | `86400` |
//! | `SEED_ADMIN_PASSWORD` | If set, seed an `admin` account at startup | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use thiserror::Error;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the base64-encoded signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the token validity in seconds.
pub const JWT_VALIDITY_ENV: &str = "JWT_TOKEN_VALIDITY_SECONDS";

/// Environment variable name for the optional admin bootstrap password.
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Default token lifetime: 24 hours.
pub const DEFAULT_VALIDITY_SECONDS: u64 = 86_400;

/// Configuration loading failure. Any of these aborts startup; the
/// service never runs with a missing or degenerate token configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {JWT_SECRET_ENV}")]
    MissingSecret,

    #[error("invalid configuration: {JWT_VALIDITY_ENV} must be a positive integer (got {0:?})")]
    InvalidValidity(String),
}

/// Token-signing settings consumed by the auth module.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Base64-encoded signing secret.
    pub secret_base64: String,
    /// Token lifetime in seconds. Always positive.
    pub validity_seconds: u64,
}

impl TokenSettings {
    /// Load token settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var(JWT_SECRET_ENV).ok(),
            env::var(JWT_VALIDITY_ENV).ok(),
        )
    }

    fn from_values(
        secret: Option<String>,
        validity: Option<String>,
    ) -> Result<Self, ConfigError> {
        let secret_base64 = secret.ok_or(ConfigError::MissingSecret)?;

        let validity_seconds = match validity {
            None => DEFAULT_VALIDITY_SECONDS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => seconds,
                _ => return Err(ConfigError::InvalidValidity(raw)),
            },
        };

        Ok(Self {
            secret_base64,
            validity_seconds,
        })
    }
}
