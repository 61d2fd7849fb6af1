//! Session revocation.

use tracing::{debug, info};

use crate::common::AuthError;
use crate::domains::auth::resolver::Principal;
use crate::kernel::{AdminAccountStore, AuthDeps, PhoneAccountStore, RevokedTokenStore};

/// Revoke `token` and detach it from its owner's token list.
///
/// Revocation must land before the list removal: a revoked token is
/// rejected even though it still verifies. When no principal is attached
/// to the request (the token's account may already be gone) the removal is
/// skipped without failing the logout. Calling this twice for the same
/// token is a no-op the second time.
pub async fn logout(
    deps: &AuthDeps,
    token: &str,
    principal: Option<&Principal>,
) -> Result<(), AuthError> {
    deps.revoked_tokens.revoke(token).await?;

    match principal {
        Some(Principal::Admin(account)) => {
            deps.admin_accounts.remove_token(account.id, token).await?;
            info!("Logged out administrative account {}", account.id);
        }
        Some(Principal::Phone(account)) => {
            deps.phone_accounts.remove_token(account.id, token).await?;
            info!("Logged out phone account {}", account.id);
        }
        None => debug!("Logout for a token with no attached principal"),
    }

    Ok(())
}
