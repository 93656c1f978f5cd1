//! Registration, login, and session management.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{extract::State, middleware, Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, CurrentUser};
use crate::{AppError, AppState};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .layer(middleware::from_fn_with_state(state, auth::require_auth));

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let email = body.email.trim().to_lowercase();
    let name = body.name.trim();
    if email.is_empty() || name.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "email, password and name are required".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(&email, name, &auth::hash_password(&body.password))
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user = state.store.find_user_by_email(&email).await?;
    let user = match user {
        Some(u) if auth::verify_password(&body.password, &u.password_hash) => u,
        // One message for both cases: don't reveal which part was wrong.
        _ => {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ))
        }
    };

    let token = auth::new_session_token();
    let expires_at = state
        .store
        .create_session(user.id, &auth::hash_token(&token), state.config.session_ttl)
        .await?;

    Ok(Json(json!({
        "message": "Login successful",
        "access_token": token,
        "expires_at": expires_at,
        "user": { "id": user.id, "email": user.email, "name": user.name },
    })))
}

async fn me(Extension(user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(json!({ "id": user.id, "email": user.email, "name": user.name }))
}

async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    // require_auth already validated the token; re-extract it to revoke.
    if let Some(token) = auth::extract_bearer_token(&headers) {
        state.store.delete_session(&auth::hash_token(&token)).await?;
    }
    Ok(Json(json!({ "message": "Logged out" })))
}
