//! Session-token authentication.
//!
//! Login hands out an opaque bearer token; only its SHA-256 hash is stored,
//! so the sessions table never holds a usable credential. Lookups compare
//! fixed-length hashes, which also keeps them free of timing side-channels.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{AppError, AppState};

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;

/// Hash a session token for storage and lookup.
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Salted password digest, stored as `salt$hex`.
pub(crate) fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let digest = password_digest(&salt, password);
    format!("{}${}", salt, digest)
}

pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => password_digest(salt, password) == expected,
        None => false,
    }
}

pub(crate) fn new_session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// The authenticated user, inserted into request extensions by
/// `require_auth` and read back by protected handlers via `Extension`.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("Authorization")?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Middleware guarding the endpoints that act on a user's saved data.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers).ok_or_else(|| {
        AppError::Unauthorized("Missing bearer token. Provide via Authorization header.".to_string())
    })?;

    let user = state
        .store
        .find_session_user(&hash_token(&token))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
    });

    Ok(next.run(request).await)
}
