// TestDependencies - in-memory implementations for testing
//
// Functional in-memory stores plus a recording SMS service that can be
// wired into AuthDeps in place of Postgres and the SMS gateway. Every
// mutation happens under a single write lock, mirroring the per-record
// atomic upserts of the Postgres stores.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domains::auth::jwt::TokenService;
use crate::domains::auth::models::{AdminAccount, PhoneAccount, REVOCATION_RETENTION_HOURS};

use super::deps::AuthDeps;
use super::{AdminAccountStore, BaseSmsService, PhoneAccountStore, RevokedTokenStore};

// =============================================================================
// In-Memory Admin Account Store
// =============================================================================

pub struct MemoryAdminAccountStore {
    accounts: RwLock<HashMap<Uuid, AdminAccount>>,
}

impl MemoryAdminAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryAdminAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminAccountStore for MemoryAdminAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn insert(&self, account: &AdminAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(anyhow!(
                "duplicate key value violates unique constraint \"admin_accounts_email_key\""
            ));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.tokens.push(token.to_string());
        }
        Ok(())
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.tokens.retain(|t| t != token);
        }
        Ok(())
    }
}

// =============================================================================
// In-Memory Phone Account Store
// =============================================================================

pub struct MemoryPhoneAccountStore {
    accounts: RwLock<HashMap<String, PhoneAccount>>,
}

impl MemoryPhoneAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Override the pending challenge's expiry, for tests that need an
    /// already-expired code.
    pub async fn set_challenge_expiry(&self, phone: &str, expires_at: DateTime<Utc>) {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(phone) {
            account.otp_expires_at = Some(expires_at);
        }
    }
}

impl Default for MemoryPhoneAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhoneAccountStore for MemoryPhoneAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PhoneAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.id == id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<PhoneAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(phone).cloned())
    }

    async fn upsert_challenge(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PhoneAccount> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(phone.to_string())
            .or_insert_with(|| PhoneAccount::placeholder(phone.to_string()));
        account.otp_code = Some(code.to_string());
        account.otp_expires_at = Some(expires_at);
        Ok(account.clone())
    }

    async fn upsert_registration(&self, account: &PhoneAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let mut registered = account.clone();
        registered.is_registered = true;
        accounts.insert(account.phone.clone(), registered);
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.values_mut().find(|a| a.id == id) {
            account.is_verified = true;
            account.otp_code = None;
            account.otp_expires_at = None;
        }
        Ok(())
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.values_mut().find(|a| a.id == id) {
            account.tokens.push(token.to_string());
        }
        Ok(())
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.values_mut().find(|a| a.id == id) {
            account.tokens.retain(|t| t != token);
        }
        Ok(())
    }
}

// =============================================================================
// In-Memory Revoked Token Store
// =============================================================================

pub struct MemoryRevokedTokenStore {
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryRevokedTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a revocation with a chosen timestamp, for tests that need a
    /// record older than the retention window.
    pub async fn revoke_at(&self, token: &str, created_at: DateTime<Utc>) {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.to_string(), created_at);
    }
}

impl Default for MemoryRevokedTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevokedTokenStore for MemoryRevokedTokenStore {
    async fn revoke(&self, token: &str) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        // Keep the original timestamp so revoking twice is a no-op
        tokens.entry(token.to_string()).or_insert_with(Utc::now);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let tokens = self.tokens.read().await;
        let now = Utc::now();
        Ok(tokens.get(token).is_some_and(|created_at| {
            now.signed_duration_since(*created_at) < Duration::hours(REVOCATION_RETENTION_HOURS)
        }))
    }

    async fn purge_expired(&self) -> Result<u64> {
        let mut tokens = self.tokens.write().await;
        let now = Utc::now();
        let before = tokens.len();
        tokens.retain(|_, created_at| {
            now.signed_duration_since(*created_at) < Duration::hours(REVOCATION_RETENTION_HOURS)
        });
        Ok((before - tokens.len()) as u64)
    }
}

// =============================================================================
// Mock SMS Service
// =============================================================================

pub struct MockSmsService {
    calls: Mutex<Vec<(String, String)>>,
    failing: Mutex<bool>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        }
    }

    /// Make subsequent sends fail, simulating a gateway outage.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// All (phone, message) pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a message was sent to a phone number.
    pub fn was_sent_to(&self, phone: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|(p, _)| p == phone)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("sms gateway unavailable"));
        }
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        Ok(())
    }
}

// =============================================================================
// Test Dependency Bundle
// =============================================================================

/// Memory-backed `AuthDeps` plus handles to the concrete stores for
/// fixture setup and inspection.
pub struct TestDeps {
    pub deps: Arc<AuthDeps>,
    pub admin_accounts: Arc<MemoryAdminAccountStore>,
    pub phone_accounts: Arc<MemoryPhoneAccountStore>,
    pub revoked_tokens: Arc<MemoryRevokedTokenStore>,
    pub sms: Arc<MockSmsService>,
}

impl TestDeps {
    pub fn new() -> Self {
        let admin_accounts = Arc::new(MemoryAdminAccountStore::new());
        let phone_accounts = Arc::new(MemoryPhoneAccountStore::new());
        let revoked_tokens = Arc::new(MemoryRevokedTokenStore::new());
        let sms = Arc::new(MockSmsService::new());

        let deps = Arc::new(AuthDeps {
            admin_accounts: admin_accounts.clone(),
            phone_accounts: phone_accounts.clone(),
            revoked_tokens: revoked_tokens.clone(),
            sms: sms.clone(),
            tokens: TokenService::new("test_secret_key", "test_issuer".to_string()),
            admin_token_ttl: Duration::hours(1),
            phone_token_ttl: Duration::days(30),
        });

        Self {
            deps,
            admin_accounts,
            phone_accounts,
            revoked_tokens,
            sms,
        }
    }
}

impl Default for TestDeps {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemoryRevokedTokenStore::new();

        store.revoke("token-a").await.unwrap();
        assert!(store.is_revoked("token-a").await.unwrap());

        // Second revoke keeps the record and its original timestamp
        store.revoke("token-a").await.unwrap();
        assert!(store.is_revoked("token-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_lapses_after_retention() {
        let store = MemoryRevokedTokenStore::new();

        store
            .revoke_at(
                "old-token",
                Utc::now() - Duration::hours(REVOCATION_RETENTION_HOURS + 1),
            )
            .await;

        assert!(!store.is_revoked("old-token").await.unwrap());
        assert_eq!(store.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_challenge_creates_placeholder() {
        let store = MemoryPhoneAccountStore::new();
        let expiry = Utc::now() + Duration::minutes(10);

        let account = store
            .upsert_challenge("9812345678", "123456", expiry)
            .await
            .unwrap();

        assert!(!account.is_registered);
        assert!(!account.is_verified);
        assert_eq!(account.otp_code.as_deref(), Some("123456"));

        // A second challenge overwrites the first on the same record
        let again = store
            .upsert_challenge("9812345678", "654321", expiry)
            .await
            .unwrap();
        assert_eq!(again.id, account.id);
        assert_eq!(again.otp_code.as_deref(), Some("654321"));
    }
}
