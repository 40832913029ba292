use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use super::claims::Claims;
use crate::error::AppError;
use crate::guards::GuardName;
use crate::state::security_config::SecurityConfig;

/// Why a presented token did not verify.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid token")]
    Invalid,
    #[error("token issued for guard {0}")]
    WrongGuard(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::unauthorized_expired_jwt(),
            TokenError::InvalidSignature | TokenError::Invalid | TokenError::WrongGuard(_) => {
                AppError::unauthorized_invalid_jwt()
            }
        }
    }
}

/// A freshly minted access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Mints and verifies access tokens for exactly one guard.
#[derive(Debug, Clone)]
pub struct TokenService {
    guard: GuardName,
    security: SecurityConfig,
}

pub fn unix_seconds(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("Failed to get current time"))
}

/// `iat + ttl` in unix seconds; lifetimes that do not fit are an error.
pub fn expiry(iat: i64, ttl: Duration) -> Result<i64, AppError> {
    i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| iat.checked_add(secs))
        .ok_or_else(|| AppError::internal(format!("lifetime of {}s overflows", ttl.as_secs())))
}

impl TokenService {
    pub fn new(guard: GuardName, security: SecurityConfig) -> Self {
        Self { guard, security }
    }

    pub fn guard(&self) -> &GuardName {
        &self.guard
    }

    /// Mint a token for `principal_id` using the configured TTL.
    pub fn mint(&self, principal_id: i64, now: SystemTime) -> Result<IssuedToken, AppError> {
        let iat = unix_seconds(now)?;
        let expires_in = self.security.token_ttl.as_secs();

        let claims = Claims {
            sub: principal_id.to_string(),
            guard: self.guard.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: expiry(iat, self.security.token_ttl)?,
        };

        let token = encode(
            &Header::new(self.security.algorithm),
            &claims,
            &EncodingKey::from_secret(&self.security.jwt_secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))?;

        Ok(IssuedToken {
            token,
            claims,
            expires_in,
        })
    }

    /// Verify signature, expiry and guard binding.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // Pin algorithm to the configured one; exp is checked without leeway.
        let mut validation = Validation::new(self.security.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.security.jwt_secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Invalid,
        })?;

        if claims.guard != self.guard.as_str() {
            return Err(TokenError::WrongGuard(claims.guard));
        }
        Ok(claims)
    }
}
