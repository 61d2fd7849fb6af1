use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::auth::types::{AccountKind, Role};
use crate::kernel::PhoneAccountStore;

/// Phone-registered account - shopper and vendor identities keyed by
/// mobile number.
///
/// The pending challenge lives on this record: at most one code per phone,
/// the newest overwriting the previous. A challenge may precede
/// registration, in which case a placeholder row (`is_registered: false`)
/// holds the code until the profile is completed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneAccount {
    pub id: Uuid,
    pub kind: AccountKind,
    pub name: Option<String>,
    pub phone: String,
    pub pincode: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub is_registered: bool,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PhoneAccount {
    /// Placeholder row created when a challenge precedes registration.
    pub fn placeholder(phone: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: AccountKind::Customer,
            name: None,
            phone,
            pincode: None,
            email: None,
            password_hash: None,
            role: AccountKind::Customer.default_role(),
            is_verified: false,
            is_registered: false,
            otp_code: None,
            otp_expires_at: None,
            tokens: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Postgres-backed phone account store.
pub struct PostgresPhoneAccountStore {
    pool: PgPool,
}

impl PostgresPhoneAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

#[async_trait]
impl PhoneAccountStore for PostgresPhoneAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PhoneAccount>> {
        let account =
            sqlx::query_as::<_, PhoneAccount>("SELECT * FROM phone_accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<PhoneAccount>> {
        let account =
            sqlx::query_as::<_, PhoneAccount>("SELECT * FROM phone_accounts WHERE phone = $1")
                .bind(phone)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn upsert_challenge(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PhoneAccount> {
        // Single-statement upsert so two concurrent challenges for the
        // same phone cannot interleave; last writer wins.
        let placeholder = PhoneAccount::placeholder(phone.to_string());
        let account = sqlx::query_as::<_, PhoneAccount>(
            r#"
            INSERT INTO phone_accounts
                (id, kind, phone, role, is_verified, is_registered, otp_code, otp_expires_at, tokens, created_at)
            VALUES ($1, $2, $3, $4, false, false, $5, $6, '{}', $7)
            ON CONFLICT (phone) DO UPDATE SET
                otp_code = EXCLUDED.otp_code,
                otp_expires_at = EXCLUDED.otp_expires_at
            RETURNING *
            "#,
        )
        .bind(placeholder.id)
        .bind(placeholder.kind)
        .bind(phone)
        .bind(placeholder.role)
        .bind(code)
        .bind(expires_at)
        .bind(placeholder.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    async fn upsert_registration(&self, account: &PhoneAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO phone_accounts
                (id, kind, name, phone, pincode, email, password_hash, role,
                 is_verified, is_registered, otp_code, otp_expires_at, tokens, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true, $10, $11, $12, $13)
            ON CONFLICT (phone) DO UPDATE SET
                kind = EXCLUDED.kind,
                name = EXCLUDED.name,
                pincode = EXCLUDED.pincode,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                is_registered = true
            "#,
        )
        .bind(account.id)
        .bind(account.kind)
        .bind(&account.name)
        .bind(&account.phone)
        .bind(&account.pincode)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(account.is_verified)
        .bind(&account.otp_code)
        .bind(account.otp_expires_at)
        .bind(&account.tokens)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE phone_accounts
            SET is_verified = true,
                otp_code = NULL,
                otp_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<()> {
        sqlx::query("UPDATE phone_accounts SET tokens = array_append(tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()> {
        sqlx::query("UPDATE phone_accounts SET tokens = array_remove(tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
