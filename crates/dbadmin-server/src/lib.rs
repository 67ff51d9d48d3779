//! # dbadmin-server
//!
//! HTTP front end for dbadmin: a schema-agnostic admin API over the tables of
//! one PostgreSQL schema.
//!
//! The router is built from an [`AppState`] that holds the document store, the
//! credential store and the token issuer, so tests can drive it with in-memory
//! stores.

pub mod api_types;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiSettings, AppState};
