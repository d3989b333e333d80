//! Authentication middleware for JWT token validation
//!
//! Tokens are issued by the auth service. This service only verifies them,
//! with the RS256 public key when `JWT_PUBLIC_KEY` is set and with the
//! shared `JWT_SECRET` (HS256) otherwise.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i32,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
}

/// Verification half of the JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: RS256 public key (PEM format) or path to the PEM file
    /// - `JWT_SECRET`: HS256 shared secret, used when no public key is configured
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(public_key) = env::var("JWT_PUBLIC_KEY") {
            // If the public key looks like a file path, read from file
            let public_key = if public_key.starts_with("-----BEGIN") {
                public_key
            } else {
                std::fs::read_to_string(&public_key)
                    .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                    .trim()
                    .to_string()
            };
            return Self::rs256(&public_key);
        }

        let secret = env::var("JWT_SECRET").map_err(|_| {
            anyhow::anyhow!("Neither JWT_PUBLIC_KEY nor JWT_SECRET environment variable is set")
        })?;
        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        Ok(Self::hs256(secret.as_bytes()))
    }

    pub fn rs256(public_key_pem: &str) -> anyhow::Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to create decoding key: {}", e))?;
        Ok(Self {
            decoding_key,
            algorithm: Algorithm::RS256,
        })
    }

    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Validate signature and expiry of a bearer token
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                warn!("Failed to validate token: {}", e);
                ApiError::Unauthorized
            })?;

        Ok(AuthUser {
            id: token_data.claims.sub,
        })
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;
    let user = state.jwt.verify(bearer.token())?;
    debug!(user_id = user.id, "Request authenticated");

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Caller identity on routes that also serve anonymous requests.
///
/// No `Authorization` header means anonymous; a header with a bad token is
/// still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<i32> {
        self.0.map(|user| user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(axum::http::header::AUTHORIZATION) {
            return Ok(MaybeUser(None));
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        Ok(MaybeUser(Some(state.jwt.verify(bearer.token())?)))
    }
}
