use crate::config::parameter;
use crate::entity::user::User;
use crate::error::token_error::TokenError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    /// Random per-issuance id; makes two tokens for the same user and
    /// instant distinct.
    pub jti: String,
}

/// Issues signed, time-bounded access tokens. The signing key is derived
/// from the user's current password digest, as in the original system: a
/// password change ends the verifiability of earlier tokens, while session
/// revocation itself stays a store lookup.
#[derive(Clone)]
pub struct TokenService {
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(ttl_hours: i64) -> Self {
        Self { ttl_hours }
    }

    pub fn from_config() -> Self {
        Self::new(parameter::get_i64("TOKEN_TTL_HOURS"))
    }

    /// Fixed validity window applied to every signin.
    pub fn validity_window(&self) -> Duration {
        Duration::hours(self.ttl_hours)
    }

    pub fn generate_token(
        &self,
        user: &User,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: user.id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(user.password.as_bytes()),
        )
        .map_err(|e| TokenError::TokenCreation(e.to_string()))
    }

    /// Verify a token against the digest it was signed with.
    pub fn decode_token(
        &self,
        token: &str,
        password_digest: &str,
    ) -> Result<TokenData<TokenClaims>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 30;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(password_digest.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            _ => TokenError::InvalidToken,
        })
    }
}
