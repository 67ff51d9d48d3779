use crate::auth::password::hash_password;
use dbadmin_core::{AdminRecord, CredentialStore};

/// On startup, create the configured administrator if it does not exist yet.
///
/// Returns `true` if an account was created.
pub async fn bootstrap_admin(
    credentials: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> anyhow::Result<bool> {
    if username.trim().is_empty() {
        anyhow::bail!("auth.bootstrap_admin is empty");
    }
    if credentials.find_admin(username).await?.is_some() {
        return Ok(false);
    }
    if password.trim().is_empty() {
        anyhow::bail!(
            "bootstrap admin password is empty (set the variable named by auth.bootstrap_password_env)"
        );
    }

    credentials
        .insert_admin(&AdminRecord {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            email: None,
            telegram_id: None,
        })
        .await?;

    tracing::warn!(username, "bootstrapped admin account (password taken from env)");
    Ok(true)
}
