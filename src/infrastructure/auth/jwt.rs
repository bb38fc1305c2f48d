use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::repositories::access_tokens::AccessTokenValidator;

pub const ACCESS_TOKEN_ISSUER: &str = "tubely-access";

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub struct JwtAccessTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokenValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl AccessTokenValidator for JwtAccessTokenValidator {
    fn validate(&self, token: &str) -> Result<Uuid> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .context("JWT validation failed")?;

        Uuid::parse_str(&token_data.claims.sub).context("invalid user ID in token")
    }
}
