//! Route definitions.

use crate::handlers::{self, auth, tables};
use crate::middleware::auth::require_admin;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

/// Create the API router. Table endpoints require an admin token; the
/// account endpoints and `/healthz` are public.
pub fn create_router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/tableNames", get(tables::table_names))
        .route("/tableInfo", get(tables::table_info))
        .route("/tableDocuments", get(tables::table_documents))
        .route("/createDocument", post(tables::create_document))
        .route("/editDocument", post(tables::edit_document))
        .route("/deleteDocument", delete(tables::delete_document))
        .route("/dropTable", delete(tables::drop_table))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/verifyToken", post(auth::verify_token))
        .route("/healthz", get(handlers::healthz));

    guarded.merge(public).with_state(state)
}
