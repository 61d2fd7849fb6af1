//! Verify a phone challenge and open a session.

use chrono::Utc;
use tracing::info;

use crate::common::AuthError;
use crate::domains::auth::otp::check_code;
use crate::domains::auth::types::AuthenticatedSession;
use crate::kernel::{AuthDeps, PhoneAccountStore};

/// Check `code` against the pending challenge for `phone`.
///
/// On success the challenge is cleared (codes are single use), the account
/// is marked verified, and a session token is minted and appended to the
/// account's token list.
pub async fn verify_challenge(
    deps: &AuthDeps,
    phone: &str,
    code: &str,
) -> Result<AuthenticatedSession, AuthError> {
    let account = deps
        .phone_accounts
        .find_by_phone(phone)
        .await?
        .ok_or(AuthError::ChallengeNotFound)?;

    check_code(
        account.otp_code.as_deref(),
        account.otp_expires_at,
        code,
        Utc::now(),
    )?;

    deps.phone_accounts.mark_verified(account.id).await?;
    info!("Phone challenge verified for account {}", account.id);

    let issued = deps
        .tokens
        .issue(account.id, account.role, deps.phone_token_ttl)?;
    deps.phone_accounts
        .append_token(account.id, &issued.token)
        .await?;

    Ok(AuthenticatedSession {
        principal_id: account.id,
        role: account.role,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}
