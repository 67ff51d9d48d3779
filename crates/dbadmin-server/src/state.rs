//! Shared application state.

use dbadmin_biscuit::{TokenIssuer, TokenVerifier};
use dbadmin_core::{AppConfig, CredentialStore, DocumentStore};
use std::sync::Arc;

/// One hundred years.
const MAX_TOKEN_TTL_HOURS: u64 = 876_000;

/// Request-independent settings the handlers consult.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Upper bound for `document_per_page`.
    pub max_page_size: u64,
    pub token_ttl: chrono::Duration,
    /// Keep `/register` open once an administrator exists.
    pub allow_registration: bool,
}

impl ApiSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            max_page_size: cfg.database.max_page_size,
            token_ttl: chrono::Duration::hours(cfg.auth.token_ttl_hours.min(MAX_TOKEN_TTL_HOURS) as i64),
            allow_registration: cfg.auth.allow_registration,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Cheaply cloneable handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    documents: Arc<dyn DocumentStore>,
    credentials: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    settings: ApiSettings,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        credentials: Arc<dyn CredentialStore>,
        issuer: TokenIssuer,
        settings: ApiSettings,
    ) -> Self {
        let verifier = issuer.verifier();
        Self {
            inner: Arc::new(AppStateInner {
                documents,
                credentials,
                issuer,
                verifier,
                settings,
            }),
        }
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.inner.credentials.as_ref()
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.inner.issuer
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.inner.settings
    }
}
