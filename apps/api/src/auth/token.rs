use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

/// Signing parameters for access tokens.
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: String, algorithm: Algorithm, ttl_minutes: i64) -> Self {
        Self {
            secret,
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issues a bearer token for `email`. `ttl` overrides the configured lifetime.
    pub fn create_access_token(
        &self,
        email: &str,
        role: Role,
        ttl: Option<Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let exp = Utc::now() + ttl.unwrap_or(self.ttl);
        let claims = Claims {
            sub: email.to_string(),
            role,
            exp: exp.timestamp(),
        };
        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Validates signature and expiry and returns the claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}
