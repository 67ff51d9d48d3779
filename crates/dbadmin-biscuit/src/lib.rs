//! # dbadmin-biscuit
//!
//! Access tokens for dbadmin administrators.
//!
//! A successful login mints a Biscuit token signed with the server's Ed25519
//! key. The authority block carries `admin(username)`, `token_id(id)`,
//! `issued_at(ts)` and `expires_at(ts)` facts plus a `time` check that bounds
//! the token's lifetime. Verification needs only the public key.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use biscuit_auth::PublicKey;
pub use claims::{AdminClaims, VerifiedAdmin};
pub use error::BiscuitError;
pub use keys::{KeyOrigin, KeyPair};
pub use token::{TokenIssuer, TokenVerifier};
