use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use dbadmin_biscuit::VerifiedAdmin;

/// Axum middleware guarding the table endpoints.
///
/// Requires `Authorization: Bearer <token>` (the `Bearer ` prefix is optional)
/// carrying a token minted by `/login`. The verified identity is attached to
/// the request as a [`VerifiedAdmin`] extension.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let admin = state.verifier().verify(&token)?;
    tracing::debug!(username = %admin.username, token_id = %admin.token_id, "admin token accepted");

    req.extensions_mut().insert::<VerifiedAdmin>(admin);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
