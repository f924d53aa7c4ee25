//! Token signing and verification.
//!
//! Access and refresh tokens are both HS256-signed JWTs carrying the same
//! [`Claims`] shape. They differ only in secret and lifetime, and each is
//! handled by its own [`TokenSigner`]; a token signed by one signer never
//! verifies under the other.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shopgate_core::types::DbId;
use shopgate_db::models::user::User;
use uuid::Uuid;

use crate::config::{parse_or, ConfigError};

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
/// Longest lifetime either token class may be configured with.
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 3650;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issue time.
    pub email: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4); no two issued tokens share one.
    pub jti: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed token, or wrong signer.
    #[error("token is invalid")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Secret and lifetime for one class of token.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub lifetime: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Configuration for both token classes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access: TokenSettings,
    pub refresh: TokenSettings,
}

impl AuthConfig {
    /// Load token configuration through `get`.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`        | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET`       | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_MINS`   | no       | `15`    |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// The two secrets must differ.
    pub fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_secret = require_secret(get, "ACCESS_TOKEN_SECRET")?;
        let refresh_secret = require_secret(get, "REFRESH_TOKEN_SECRET")?;
        if access_secret == refresh_secret {
            return Err(ConfigError::Invalid {
                key: "REFRESH_TOKEN_SECRET",
                reason: "must differ from ACCESS_TOKEN_SECRET".into(),
            });
        }

        let access_mins: i64 = parse_or(get, "ACCESS_TOKEN_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?;
        let refresh_days: i64 =
            parse_or(get, "REFRESH_TOKEN_EXPIRY_DAYS", DEFAULT_REFRESH_EXPIRY_DAYS)?;

        Ok(Self {
            access: TokenSettings {
                secret: access_secret,
                lifetime: bounded_lifetime("ACCESS_TOKEN_EXPIRY_MINS", access_mins, Duration::try_minutes)?,
            },
            refresh: TokenSettings {
                secret: refresh_secret,
                lifetime: bounded_lifetime("REFRESH_TOKEN_EXPIRY_DAYS", refresh_days, Duration::try_days)?,
            },
        })
    }
}

fn require_secret(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match get(key) {
        Some(secret) if !secret.is_empty() => Ok(secret),
        Some(_) => Err(ConfigError::Invalid {
            key,
            reason: "must not be empty".into(),
        }),
        None => Err(ConfigError::Missing(key)),
    }
}

/// Convert a configured count into a lifetime in `(0, MAX_TOKEN_LIFETIME_DAYS]`.
fn bounded_lifetime(
    key: &'static str,
    value: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be positive, got {value}"),
        });
    }
    to_duration(value)
        .filter(|lifetime| *lifetime <= Duration::days(MAX_TOKEN_LIFETIME_DAYS))
        .ok_or_else(|| ConfigError::Invalid {
            key,
            reason: "out of range".into(),
        })
}

/// Issues and verifies tokens for one secret/lifetime pair.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No grace period: valid through the second equal to `exp`, rejected after.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            lifetime: settings.lifetime,
        }
    }

    /// Configured token lifetime. Cookie max-age is derived from this.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for `(user_id, email)` expiring one lifetime from now.
    pub fn issue(&self, user_id: DbId, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    /// Sign a token as if issued at `issued_at` (Unix seconds).
    pub fn issue_at(&self, user_id: DbId, email: &str, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + self.lifetime.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiry, returning the embedded [`Claims`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Read claims WITHOUT checking signature or expiry.
    ///
    /// Informational only (logging, diagnostics). Never base an
    /// authorization decision on the result.
    pub fn decode_unverified(token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }
}

/// Access + refresh tokens, always issued together.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The two independent signers.
#[derive(Debug, Clone)]
pub struct TokenSigners {
    pub access: TokenSigner,
    pub refresh: TokenSigner,
}

impl TokenSigners {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access: TokenSigner::new(&config.access),
            refresh: TokenSigner::new(&config.refresh),
        }
    }

    /// Mint a fresh pair for `user` from its `{id, email}`.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.access.issue(user.id, &user.email)?,
            refresh_token: self.refresh.issue(user.id, &user.email)?,
        })
    }
}
