//! Signing key and admin token failures.
//!
//! The guard answers every token variant with a 401; the variants say which
//! check a token failed so the log line does too.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BiscuitError {
    /// Not 32 bytes of hex-encoded Ed25519 key material.
    #[error("malformed signing key: {0}")]
    MalformedKey(String),

    #[error("signing key file: {0}")]
    KeyFile(#[from] std::io::Error),

    #[error("could not mint admin token: {0}")]
    Mint(String),

    /// Not a base64 biscuit, or signed with a different key.
    #[error("bad token signature or encoding: {0}")]
    BadSignature(String),

    #[error("admin token has expired")]
    Expired,

    /// Signed by this server but refused by the authorizer for another reason.
    #[error("admin token rejected: {0}")]
    Rejected(String),

    #[error("admin token carries no `{0}` fact")]
    MissingFact(String),
}
