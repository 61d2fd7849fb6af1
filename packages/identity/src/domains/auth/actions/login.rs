//! Password logins for both principal kinds.

use tracing::info;

use crate::common::AuthError;
use crate::domains::auth::password::verify_password;
use crate::domains::auth::types::AuthenticatedSession;
use crate::kernel::{AdminAccountStore, AuthDeps, PhoneAccountStore};

/// Authenticate an administrative account by email and password.
///
/// Unknown emails and wrong passwords report the same error; no token is
/// issued and the account's token list is untouched on failure.
pub async fn admin_login(
    deps: &AuthDeps,
    email: &str,
    password: &str,
) -> Result<AuthenticatedSession, AuthError> {
    let account = deps
        .admin_accounts
        .find_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &account.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let issued = deps
        .tokens
        .issue(account.id, account.role, deps.admin_token_ttl)?;
    deps.admin_accounts
        .append_token(account.id, &issued.token)
        .await?;
    info!("Administrative login for account {}", account.id);

    Ok(AuthenticatedSession {
        principal_id: account.id,
        role: account.role,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

/// Authenticate a phone account that has set a password.
pub async fn phone_login(
    deps: &AuthDeps,
    phone: &str,
    password: &str,
) -> Result<AuthenticatedSession, AuthError> {
    let account = deps
        .phone_accounts
        .find_by_phone(phone)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash = account
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, stored_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let issued = deps
        .tokens
        .issue(account.id, account.role, deps.phone_token_ttl)?;
    deps.phone_accounts
        .append_token(account.id, &issued.token)
        .await?;
    info!("Phone login for account {}", account.id);

    Ok(AuthenticatedSession {
        principal_id: account.id,
        role: account.role,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}
