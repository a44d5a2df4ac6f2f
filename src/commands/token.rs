use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::shared::AppError;

pub const DEFAULT_EXPIRATION_DAYS: i64 = 90;

/// Claims carried by command tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminClaims {
    pub sub: String,
    pub admin: bool,
    pub iat: usize,
    pub exp: usize,
}

/// Signs and validates HS256 command tokens
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_days: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_days: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_days,
        }
    }

    #[instrument(skip(self))]
    pub fn create_token(&self, subject: &str, admin: bool) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::days(self.expiration_days)).timestamp() as usize;

        let claims = AdminClaims {
            sub: subject.to_string(),
            admin,
            iat: now.timestamp() as usize,
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode token");
            AppError::Internal(format!("Could not sign token: {e}"))
        })
    }

    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, AppError> {
        decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| {
            debug!(sub = %data.claims.sub, admin = data.claims.admin, "Token validated");
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode token");
            AppError::JwtError(e.to_string())
        })
    }
}
