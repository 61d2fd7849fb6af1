//! Principal resolution for verified tokens.
//!
//! One token format serves both account kinds and the payload carries only
//! an opaque id and role, so resolution tries the administrative store
//! first and then the phone store. Ids are UUIDs drawn independently per
//! store; a collision cannot occur by construction, and no kind tag is
//! stored in the token.

use uuid::Uuid;

use crate::common::AuthError;
use crate::kernel::{AdminAccountStore, AuthDeps, PhoneAccountStore};

use super::models::{AdminAccount, PhoneAccount};
use super::types::Role;

/// An authenticated identity: administrative or phone-registered.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(AdminAccount),
    Phone(PhoneAccount),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Admin(account) => account.id,
            Principal::Phone(account) => account.id,
        }
    }

    /// Role currently stored on the account. Tokens carry their own copy
    /// from issuance time; request authorization uses that one.
    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(account) => account.role,
            Principal::Phone(account) => account.role,
        }
    }
}

/// Load the principal owning `id`, administrative store first.
pub async fn resolve(deps: &AuthDeps, id: Uuid) -> Result<Principal, AuthError> {
    if let Some(account) = deps.admin_accounts.find_by_id(id).await? {
        return Ok(Principal::Admin(account));
    }

    if let Some(account) = deps.phone_accounts.find_by_id(id).await? {
        return Ok(Principal::Phone(account));
    }

    Err(AuthError::PrincipalNotFound)
}
