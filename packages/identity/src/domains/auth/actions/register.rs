//! Account creation paths.

use serde::Deserialize;
use tracing::info;

use crate::common::AuthError;
use crate::domains::auth::models::{AdminAccount, PhoneAccount};
use crate::domains::auth::password::hash_password;
use crate::domains::auth::phone::validate_mobile;
use crate::domains::auth::types::{AccountKind, AuthenticatedSession, Role};
use crate::kernel::{AdminAccountStore, AuthDeps, PhoneAccountStore};

/// Fields accepted when registering a phone account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoneAccount {
    pub phone: String,
    pub kind: AccountKind,
    pub name: String,
    pub pincode: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Create an administrative account and open a session for it.
///
/// Duplicate emails conflict distinctly so the client can prompt a login
/// instead of a registration.
pub async fn register_admin(
    deps: &AuthDeps,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<AuthenticatedSession, AuthError> {
    if !matches!(role, Role::Admin | Role::User) {
        return Err(AuthError::Validation(
            "Administrative accounts must be admin or user".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation(format!("Invalid email: {}", email)));
    }

    if deps.admin_accounts.find_by_email(email).await?.is_some() {
        return Err(AuthError::Conflict(format!(
            "An account already exists for {}",
            email
        )));
    }

    let account = AdminAccount::new(
        name.to_string(),
        email.to_string(),
        hash_password(password)?,
        role,
    );
    deps.admin_accounts.insert(&account).await?;
    info!("Administrative account created: {}", account.id);

    let issued = deps
        .tokens
        .issue(account.id, account.role, deps.admin_token_ttl)?;
    deps.admin_accounts
        .append_token(account.id, &issued.token)
        .await?;

    Ok(AuthenticatedSession {
        principal_id: account.id,
        role: account.role,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

/// Register a phone account, completing a placeholder left by an earlier
/// challenge if one exists.
pub async fn register_phone(
    deps: &AuthDeps,
    new: NewPhoneAccount,
) -> Result<AuthenticatedSession, AuthError> {
    validate_mobile(&new.phone)?;

    if new.kind == AccountKind::Vendor && new.pincode.is_none() {
        return Err(AuthError::Validation(
            "Vendor accounts require a pincode".to_string(),
        ));
    }

    let existing = deps.phone_accounts.find_by_phone(&new.phone).await?;
    if let Some(account) = &existing {
        if account.is_registered {
            return Err(AuthError::Conflict(format!(
                "An account already exists for {}",
                new.phone
            )));
        }
    }

    let mut account = existing.unwrap_or_else(|| PhoneAccount::placeholder(new.phone.clone()));
    account.kind = new.kind;
    account.name = Some(new.name);
    account.pincode = new.pincode;
    account.email = new.email;
    account.password_hash = match new.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    account.role = new.kind.default_role();
    account.is_registered = true;

    deps.phone_accounts.upsert_registration(&account).await?;
    info!(
        "Phone account registered: {} ({})",
        account.id,
        account.kind.as_str()
    );

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
