// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Business logic
// (challenge issuance, login flows, logout) lives in domain actions that
// use these traits.
//
// Naming convention: Base* for service traits, *Store for record stores.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domains::auth::models::{AdminAccount, PhoneAccount};

// =============================================================================
// SMS Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Send a text message to a phone number in E.164 form without the
    /// leading plus.
    async fn send_sms(&self, phone: &str, message: &str) -> Result<()>;
}

// =============================================================================
// Account Store Traits (Infrastructure)
// =============================================================================

#[async_trait]
pub trait AdminAccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>>;

    async fn insert(&self, account: &AdminAccount) -> Result<()>;

    /// Append a freshly issued token to the account's token list.
    async fn append_token(&self, id: Uuid, token: &str) -> Result<()>;

    /// Remove a token from the account's token list.
    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()>;
}

#[async_trait]
pub trait PhoneAccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PhoneAccount>>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<PhoneAccount>>;

    /// Store a pending challenge for `phone`, creating a placeholder
    /// account if none exists. Overwrites any prior pending challenge in a
    /// single atomic write; last writer wins.
    async fn upsert_challenge(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PhoneAccount>;

    /// Write a completed registration, creating the row or completing a
    /// placeholder left by an earlier challenge.
    async fn upsert_registration(&self, account: &PhoneAccount) -> Result<()>;

    /// Mark the phone as verified and clear the pending challenge so a
    /// code cannot be replayed.
    async fn mark_verified(&self, id: Uuid) -> Result<()>;

    async fn append_token(&self, id: Uuid, token: &str) -> Result<()>;

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()>;
}

// =============================================================================
// Revoked Token Store Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait RevokedTokenStore: Send + Sync {
    /// Record a token as revoked. Revoking an already-revoked token is a
    /// no-op.
    async fn revoke(&self, token: &str) -> Result<()>;

    /// Whether the token was revoked within the retention window.
    async fn is_revoked(&self, token: &str) -> Result<bool>;

    /// Drop records older than the retention window. Returns the number
    /// removed.
    async fn purge_expired(&self) -> Result<u64>;
}
