//! Token minting and verification.

use crate::claims::{AdminClaims, VerifiedAdmin};
use crate::error::BiscuitError;
use crate::keys::KeyPair;
use biscuit_auth::builder::AuthorizerBuilder;
use biscuit_auth::macros::{check, fact};
use biscuit_auth::{Authorizer, Biscuit, PublicKey};
use chrono::{DateTime, Utc};

/// Mints admin access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    keypair: KeyPair,
}

impl TokenIssuer {
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Mint a token for `username` valid for `ttl`.
    pub fn mint_admin_token(
        &self,
        username: &str,
        ttl: chrono::Duration,
    ) -> Result<String, BiscuitError> {
        self.mint(&AdminClaims::new(username, ttl))
    }

    pub fn mint(&self, claims: &AdminClaims) -> Result<String, BiscuitError> {
        let biscuit = Biscuit::builder()
            .fact(fact!("admin({username})", username = claims.username.clone()))
            .map_err(|e| BiscuitError::Mint(e.to_string()))?
            .fact(fact!("token_id({id})", id = claims.token_id.to_string()))
            .map_err(|e| BiscuitError::Mint(e.to_string()))?
            .fact(fact!(
                "issued_at({timestamp})",
                timestamp = claims.issued_at.timestamp()
            ))
            .map_err(|e| BiscuitError::Mint(e.to_string()))?
            .fact(fact!(
                "expires_at({timestamp})",
                timestamp = claims.expires_at.timestamp()
            ))
            .map_err(|e| BiscuitError::Mint(e.to_string()))?
            .check(check!(
                "check if time($time), $time < {expires_at}",
                expires_at = claims.expires_at.timestamp()
            ))
            .map_err(|e| BiscuitError::Mint(e.to_string()))?
            .build(self.keypair.inner())
            .map_err(|e| BiscuitError::Mint(e.to_string()))?;

        biscuit
            .to_base64()
            .map_err(|e| BiscuitError::Mint(e.to_string()))
    }

    /// Verifier for the tokens this issuer mints.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.keypair.public_key())
    }
}

/// Verifies admin access tokens against a public key.
#[derive(Clone)]
pub struct TokenVerifier {
    public_key: PublicKey,
}

impl TokenVerifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Check signature and expiry, then extract the admin identity.
    ///
    /// An expired token is reported as [`BiscuitError::Expired`] and a token
    /// without an `admin` fact as [`BiscuitError::MissingFact`].
    pub fn verify(&self, token: &str) -> Result<VerifiedAdmin, BiscuitError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedAdmin, BiscuitError> {
        let biscuit = Biscuit::from_base64(token.trim(), self.public_key.clone())
            .map_err(|e| BiscuitError::BadSignature(e.to_string()))?;

        let now = now.timestamp();
        let mut authorizer = AuthorizerBuilder::new()
            .code(format!(
                r#"
                time({now});
                allow if admin($username);
                "#
            ))
            .map_err(|e| BiscuitError::Rejected(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| BiscuitError::Rejected(e.to_string()))?;

        if let Err(e) = authorizer.authorize() {
            return Err(explain_rejection(&mut authorizer, now, e));
        }

        let username: String = query_first(&mut authorizer, "admin")?;
        let token_id: String = query_first(&mut authorizer, "token_id")?;
        let issued_at = query_first::<i64>(&mut authorizer, "issued_at")
            .ok()
            .and_then(|ts| DateTime::from_timestamp(ts, 0));

        Ok(VerifiedAdmin {
            username,
            token_id,
            issued_at,
        })
    }
}

/// Name the reason an authorizer refused a token.
fn explain_rejection(
    authorizer: &mut Authorizer,
    now: i64,
    err: biscuit_auth::error::Token,
) -> BiscuitError {
    if let Ok(expires_at) = query_first::<i64>(authorizer, "expires_at")
        && now >= expires_at
    {
        return BiscuitError::Expired;
    }
    match query_first::<String>(authorizer, "admin") {
        Err(missing @ BiscuitError::MissingFact(_)) => missing,
        _ => BiscuitError::Rejected(err.to_string()),
    }
}

/// First value of the single-term fact `name` in the authority block.
fn query_first<T>(authorizer: &mut Authorizer, name: &str) -> Result<T, BiscuitError>
where
    (T,): TryFrom<biscuit_auth::builder::Fact, Error = biscuit_auth::error::Token>,
{
    let rule: biscuit_auth::builder::Rule = format!("data($x) <- {name}($x)")
        .parse()
        .map_err(|e: biscuit_auth::error::Token| BiscuitError::Rejected(e.to_string()))?;

    let results: Vec<(T,)> = authorizer
        .query(rule)
        .map_err(|e| BiscuitError::Rejected(e.to_string()))?;

    results
        .into_iter()
        .next()
        .map(|(v,)| v)
        .ok_or_else(|| BiscuitError::MissingFact(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(KeyPair::generate().unwrap())
    }

    #[test]
    fn test_mint_and_verify_admin_token() {
        let issuer = issuer();
        let token = issuer.mint_admin_token("root", Duration::hours(72)).unwrap();
        assert!(!token.is_empty());

        let verified = issuer.verifier().verify(&token).unwrap();
        assert_eq!(verified.username, "root");
        assert!(!verified.token_id.is_empty());
        assert!(verified.issued_at.is_some());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer.mint_admin_token("root", Duration::hours(1)).unwrap();

        let later = Utc::now() + Duration::hours(2);
        assert!(matches!(
            issuer.verifier().verify_at(&token, later),
            Err(BiscuitError::Expired)
        ));
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let token = issuer().mint_admin_token("root", Duration::hours(1)).unwrap();
        assert!(matches!(
            issuer().verifier().verify(&token),
            Err(BiscuitError::BadSignature(_))
        ));
    }

    #[test]
    fn test_token_without_admin_fact_rejected() {
        let keypair = KeyPair::generate().unwrap();
        let token = Biscuit::builder()
            .fact(fact!("token_id({id})", id = "orphan".to_string()))
            .unwrap()
            .build(keypair.inner())
            .unwrap()
            .to_base64()
            .unwrap();

        match TokenVerifier::new(keypair.public_key()).verify(&token) {
            Err(BiscuitError::MissingFact(fact)) => assert_eq!(fact, "admin"),
            other => panic!("unexpected verification result: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            issuer().verifier().verify("not-a-token"),
            Err(BiscuitError::BadSignature(_))
        ));
        assert!(issuer().verifier().verify("").is_err());
    }
}
