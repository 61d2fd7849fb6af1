use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::common::AuthError;
use crate::domains::auth::resolver::{resolve, Principal};
use crate::domains::auth::types::Role;
use crate::kernel::{AuthDeps, RevokedTokenStore};

/// Authenticated request context: the resolved principal plus the role the
/// token was issued with.
///
/// The role comes from the token payload, not from the freshly loaded
/// account, so a role change takes effect only once the holder
/// re-authenticates.
#[derive(Clone)]
pub struct AuthContext {
    pub principal: Arc<Principal>,
    pub role: Role,
    pub token: String,
}

impl AuthContext {
    /// Role gate over the token-declared role.
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Authentication middleware
///
/// Extracts the bearer token, rejects revoked tokens before trusting
/// signature or expiry, verifies the token, resolves the owning principal,
/// and attaches an `AuthContext` to request extensions. Any failed step
/// short-circuits with the uniform unauthorized response.
pub async fn require_auth(
    State(deps): State<Arc<AuthDeps>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&request, &deps).await {
        Ok(ctx) => {
            debug!(
                "Authenticated principal {} (role: {})",
                ctx.principal.id(),
                ctx.role
            );
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Admin gate for route groups mounted behind `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let gate = match request.extensions().get::<AuthContext>() {
        Some(ctx) => ctx.authorize(&[Role::Admin]),
        None => Err(AuthError::NoToken),
    };

    match gate {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

/// Run the authentication pipeline for a request.
pub async fn authenticate(request: &Request, deps: &AuthDeps) -> Result<AuthContext, AuthError> {
    let token = bearer_token(request)?;

    // Revocation comes first: a logged-out token still looks valid to the
    // signature and expiry checks
    if deps.revoked_tokens.is_revoked(token).await? {
        return Err(AuthError::TokenRevoked);
    }

    let claims = deps.tokens.verify(token)?;
    let principal = resolve(deps, claims.principal_id()?).await?;

    Ok(AuthContext {
        principal: Arc::new(principal),
        role: claims.role,
        token: token.to_string(),
    })
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(request: &Request) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get("authorization")
        .ok_or(AuthError::NoToken)?;
    let value = header.to_str().map_err(|_| AuthError::NoToken)?;

    // Handle both "Bearer <token>" and a raw token
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(AuthError::NoToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use crate::domains::auth::models::AdminAccount;
    use crate::kernel::{AdminAccountStore, TestDeps};

    fn request_with_header(value: &str) -> Request {
        Request::builder()
            .header("authorization", value)
            .body(Body::empty())
            .unwrap()
    }

    async fn seeded_admin(harness: &TestDeps) -> AdminAccount {
        let account = AdminAccount::new(
            "Asha".to_string(),
            "asha@example.com".to_string(),
            "unused-hash".to_string(),
            Role::Admin,
        );
        harness.admin_accounts.insert(&account).await.unwrap();
        account
    }

    #[tokio::test]
    async fn test_authenticate_with_bearer_prefix() {
        let harness = TestDeps::new();
        let account = seeded_admin(&harness).await;
        let issued = harness
            .deps
            .tokens
            .issue(account.id, Role::Admin, chrono::Duration::hours(1))
            .unwrap();

        let request = request_with_header(&format!("Bearer {}", issued.token));
        let ctx = authenticate(&request, &harness.deps).await.unwrap();
        assert_eq!(ctx.principal.id(), account.id);
        assert_eq!(ctx.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authenticate_without_bearer_prefix() {
        let harness = TestDeps::new();
        let account = seeded_admin(&harness).await;
        let issued = harness
            .deps
            .tokens
            .issue(account.id, Role::Admin, chrono::Duration::hours(1))
            .unwrap();

        let request = request_with_header(&issued.token);
        let ctx = authenticate(&request, &harness.deps).await.unwrap();
        assert_eq!(ctx.principal.id(), account.id);
    }

    #[tokio::test]
    async fn test_no_auth_header() {
        let harness = TestDeps::new();
        let request = Request::builder().body(Body::empty()).unwrap();

        let result = authenticate(&request, &harness.deps).await;
        assert!(matches!(result, Err(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let harness = TestDeps::new();
        let request = request_with_header("Bearer not_a_token");

        let result = authenticate(&request, &harness.deps).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_authorize_gates_on_token_role() {
        let harness = TestDeps::new();
        let account = seeded_admin(&harness).await;
        let issued = harness
            .deps
            .tokens
            .issue(account.id, Role::User, chrono::Duration::hours(1))
            .unwrap();

        let request = request_with_header(&format!("Bearer {}", issued.token));
        let ctx = authenticate(&request, &harness.deps).await.unwrap();

        // The token says user even though the stored account says admin;
        // the token-declared role wins until re-authentication.
        assert_eq!(ctx.role, Role::User);
        assert!(matches!(
            ctx.authorize(&[Role::Admin]),
            Err(AuthError::Forbidden)
        ));
        assert!(ctx.authorize(&[Role::Admin, Role::User]).is_ok());
    }
}
