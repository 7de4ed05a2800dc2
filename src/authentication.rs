use std::sync::Arc;

use crate::{errors::RequestError, AppState};
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
struct AuthClaim {
    id: i64,
    exp: i64,
}

/// HS256 keys shared by every request.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: time::Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: time::Duration) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, id: i64) -> Result<String> {
        let expiry_date = OffsetDateTime::now_utc() + self.ttl;
        let claim = AuthClaim {
            id,
            exp: expiry_date.unix_timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claim, &self.encoding)
            .context("Failed to generate jwt token")
    }

    pub fn verify(&self, token: &str) -> Result<i64, RequestError> {
        let token_data =
            jsonwebtoken::decode::<AuthClaim>(token, &self.decoding, &Validation::default())
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected token");
                    RequestError::NotAuthorized("Invalid token")
                })?;
        let claim = token_data.claims;
        if claim.exp < OffsetDateTime::now_utc().unix_timestamp() {
            return Err(RequestError::NotAuthorized("Token expired"));
        }
        Ok(claim.id)
    }
}

/// An authenticated caller. Extracting it rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub token: String,
}

/// The caller, if any. Missing or unusable tokens make the request anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<i64> {
        self.0.as_ref().map(|a| a.id)
    }
}

fn app_state(parts: &Parts) -> Result<Arc<AppState>, RequestError> {
    parts
        .extensions
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or_else(|| RequestError::ServerError(anyhow::anyhow!("application state missing")))
}

/// Accepts `Token <jwt>` (RealWorld) and `Bearer <jwt>`.
fn parse_authorization(header: &str) -> Option<&str> {
    header
        .strip_prefix("Token ")
        .or_else(|| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(parts: &Parts, keys: &JwtKeys) -> Result<Option<AuthUser>, RequestError> {
    let header = match parts.headers.get(AUTHORIZATION) {
        Some(header) => header,
        None => return Ok(None),
    };
    let header = header
        .to_str()
        .map_err(|_| RequestError::NotAuthorized("Invalid token"))?;
    let token = parse_authorization(header).ok_or(RequestError::NotAuthorized("Invalid token"))?;
    let id = keys.verify(token)?;
    Ok(Some(AuthUser {
        id,
        token: token.to_string(),
    }))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let state = app_state(parts)?;
        match authenticate(parts, &state.jwt) {
            Ok(user) => Ok(MaybeUser(user)),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let state = app_state(parts)?;
        authenticate(parts, &state.jwt)?.ok_or(RequestError::NotAuthorized("Missing token"))
    }
}

pub async fn verify_password_argon2(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Stored password hash is malformed"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
