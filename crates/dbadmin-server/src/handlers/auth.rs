//! Login, registration and token verification.

use crate::api_types::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, VerifyTokenRequest,
    VerifyTokenResponse,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use dbadmin_core::AdminRecord;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;

    let admin = state
        .credentials()
        .find_admin(req.username.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&req.password, &admin.password_hash) {
        tracing::info!(username = %admin.username, "login rejected");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state
        .issuer()
        .mint_admin_token(&admin.username, state.settings().token_ttl)
        .map_err(|e| ApiError::Internal(format!("unable to create token: {e}")))?;

    tracing::info!(username = %admin.username, "admin logged in");
    Ok(Json(LoginResponse {
        message: "You logged in successfully!".to_string(),
        token,
    }))
}

/// `POST /register`
///
/// Open while no administrator exists, or always when `auth.allow_registration` is set.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    if !state.settings().allow_registration && state.credentials().admin_count().await? > 0 {
        return Err(ApiError::Forbidden("Registration is closed".to_string()));
    }

    if state.credentials().find_admin(username).await?.is_some() {
        return Err(ApiError::Conflict(
            "This username is already taken".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("unable to hash password: {e}")))?;

    state
        .credentials()
        .insert_admin(&AdminRecord {
            username: username.to_string(),
            password_hash,
            email: non_empty(req.email),
            telegram_id: non_empty(req.telegram_id),
        })
        .await?;

    Ok(Json(MessageResponse::new("You are registered successfully!")))
}

/// `POST /verifyToken`
pub async fn verify_token(
    State(state): State<AppState>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let Json(req) = payload?;
    let admin = state.verifier().verify(&req.token)?;
    Ok(Json(VerifyTokenResponse {
        message: "You are verified successfully!".to_string(),
        username: admin.username,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
