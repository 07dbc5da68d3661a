// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token issuance and validation.
//!
//! Tokens are compact HS512-signed JWTs carrying three claims:
//!
//! - `sub`: the principal's username
//! - `auth`: the granted role names, comma-joined
//! - `exp` / `iat`: expiry and issue time
//!
//! A token is self-contained: validation needs only the shared signing
//! key and the clock, never a session store. The flip side is that there
//! is no revocation: a stolen token is valid until its `exp` passes.
//!
//! ## Known wire-format limitation
//!
//! The `auth` claim does not escape commas, so a role name containing a
//! literal `,` would be split into two roles on decode. Role names are
//! constrained to the `ROLE_*` identifiers this service grants, which
//! never contain commas; the compact format is kept for compatibility
//! with tokens already in circulation.

use base64ct::{Base64, Encoding};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::principal::Principal;

/// Minimum decoded secret length for HS512, per RFC 7518 §3.2 (the key
/// must be at least as long as the hash output).
const HS512_MIN_SECRET_BYTES: usize = 64;

/// Failure kinds for signing-key derivation (startup-time only).
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("signing secret is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("signing secret is too short for HS512: {len} bytes (minimum {HS512_MIN_SECRET_BYTES})")]
    WeakSecret { len: usize },
}

/// Distinct failure kinds for token validation.
///
/// Callers log and count these separately: signature tampering and
/// ordinary expiry are very different operational signals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token string is not a well-formed signed token
    #[error("token is malformed")]
    Malformed,

    /// Signature does not match the recomputed MAC
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Expiry timestamp is not in the future
    #[error("token has expired")]
    Expired,

    /// Structurally parseable but signed with an unsupported algorithm
    #[error("token uses an unsupported signing algorithm")]
    UnsupportedFormat,

    /// Issue-side failure; never produced by `decode`
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims carried in every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the principal's username
    sub: String,
    /// Granted role names, comma-joined
    auth: String,
    /// Issued-at (Unix timestamp)
    iat: i64,
    /// Expiry (Unix timestamp)
    exp: i64,
}

/// Process-wide symmetric signing key, derived once at startup from the
/// configured base64-encoded secret and read-only afterwards.
///
/// The same key signs and verifies (HMAC), so it is held as a prepared
/// encoding/decoding pair. Rotation would slot in here (a key
/// identifier in the token header selecting among several `SigningKey`s)
/// without touching the codec's public contract.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Derive the key pair from a base64-encoded secret.
    pub fn from_base64_secret(secret: &str) -> Result<Self, KeyError> {
        let bytes =
            Base64::decode_vec(secret).map_err(|e| KeyError::InvalidBase64(e.to_string()))?;

        if bytes.len() < HS512_MIN_SECRET_BYTES {
            return Err(KeyError::WeakSecret { len: bytes.len() });
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(&bytes),
            decoding: DecodingKey::from_secret(&bytes),
        })
    }
}

/// Issues and validates signed tokens.
///
/// Stateless and safe for unsynchronized concurrent use: every method is
/// a pure function of its input, the clock, and the immutable key.
pub struct TokenProvider {
    keys: SigningKey,
    validity: Duration,
    validation: Validation,
}

impl TokenProvider {
    /// Create a provider with the given key and token validity.
    ///
    /// `validity_seconds` must be positive; config loading rejects zero
    /// before construction (see `config::TokenSettings`).
    pub fn new(keys: SigningKey, validity_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is the only invalidation mechanism, so no clock-skew grace
        validation.leeway = 0;

        Self {
            keys,
            validity: Duration::seconds(validity_seconds as i64),
            validation,
        }
    }

    /// Issue a signed token for the principal.
    ///
    /// The token expires `validity_seconds` after the moment of issue.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now();
        let authorities: Vec<&str> = principal.roles().iter().map(String::as_str).collect();

        let claims = Claims {
            sub: principal.name().to_string(),
            auth: authorities.join(","),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and extract the principal it authenticates.
    ///
    /// Verifies the three-part structure, the HS512 signature, and that
    /// the expiry is in the future. The roles claim splits on `,`; an
    /// empty claim yields an empty role set rather than a set containing
    /// one empty string.
    pub fn decode(&self, token: &str) -> Result<Principal, TokenError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnsupportedFormat
                }
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        let roles = claims
            .auth
            .split(',')
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Principal::new(claims.sub, roles))
    }

    /// Convenience check: true iff `decode` would succeed.
    pub fn validate(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{ROLE_ADMIN, ROLE_USER};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::collections::BTreeSet;

    /// 64 zero bytes, base64-encoded: the shortest secret HS512 accepts.
    fn test_secret() -> String {
        STANDARD.encode([0u8; 64])
    }

    fn test_provider() -> TokenProvider {
        let keys = SigningKey::from_base64_secret(&test_secret()).unwrap();
        TokenProvider::new(keys, 3600)
    }

    fn alice() -> Principal {
        Principal::new(
            "alice",
            BTreeSet::from([ROLE_USER.to_string(), ROLE_ADMIN.to_string()]),
        )
    }

    #[test]
    fn round_trip_preserves_name_and_roles() {
        let provider = test_provider();
        let token = provider.issue(&alice()).unwrap();
        let decoded = provider.decode(&token).unwrap();

        assert_eq!(decoded.name(), "alice");
        assert_eq!(decoded.roles(), alice().roles());
    }

    #[test]
    fn empty_role_set_round_trips_to_empty_set() {
        let provider = test_provider();
        let principal = Principal::new("bob", BTreeSet::new());

        let token = provider.issue(&principal).unwrap();
        let decoded = provider.decode(&token).unwrap();

        // The empty claim must not become a set holding one empty string
        assert!(decoded.roles().is_empty());
    }

    #[test]
    fn tampered_signature_is_detected() {
        let provider = test_provider();
        let token = provider.issue(&alice()).unwrap();

        // Flip the last character of the signature segment
        let tampered = if token.ends_with('A') {
            format!("{}B", &token[..token.len() - 1])
        } else {
            format!("{}A", &token[..token.len() - 1])
        };

        assert_eq!(
            provider.decode(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let provider = test_provider();
        let secret = STANDARD.decode(test_secret()).unwrap();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: "alice".to_string(),
            auth: ROLE_USER.to_string(),
            iat: now - 200,
            exp: now - 100,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .unwrap();

        assert_eq!(provider.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        let provider = test_provider();
        assert_eq!(provider.decode("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(provider.decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_algorithm_is_unsupported() {
        let provider = test_provider();
        let secret = STANDARD.decode(test_secret()).unwrap();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: "alice".to_string(),
            auth: ROLE_USER.to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .unwrap();

        assert_eq!(provider.decode(&token), Err(TokenError::UnsupportedFormat));
    }

    #[test]
    fn empty_subject_is_malformed() {
        let provider = test_provider();
        let secret = STANDARD.decode(test_secret()).unwrap();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: String::new(),
            auth: ROLE_USER.to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .unwrap();

        assert_eq!(provider.decode(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn validate_agrees_with_decode() {
        let provider = test_provider();
        let good = provider.issue(&alice()).unwrap();

        for candidate in [good.as_str(), "not-a-token", "", "a.b.c"] {
            assert_eq!(
                provider.validate(candidate),
                provider.decode(candidate).is_ok()
            );
        }
    }

    #[test]
    fn invalid_base64_secret_is_rejected() {
        let result = SigningKey::from_base64_secret("!!not base64!!");
        assert!(matches!(result, Err(KeyError::InvalidBase64(_))));
    }

    #[test]
    fn short_secret_is_rejected() {
        let short = STANDARD.encode([0u8; 16]);
        let result = SigningKey::from_base64_secret(&short);
        assert!(matches!(result, Err(KeyError::WeakSecret { len: 16 })));
    }
}
