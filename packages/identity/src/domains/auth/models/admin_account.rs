use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::auth::types::Role;
use crate::kernel::AdminAccountStore;

/// Administrative account - staff identities that sign in with email and
/// password.
///
/// Exactly one account exists per email. The account exclusively owns its
/// token list: a token is appended on every successful login or
/// registration and removed on logout.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            tokens: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Postgres-backed administrative account store.
pub struct PostgresAdminAccountStore {
    pool: PgPool,
}

impl PostgresAdminAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

#[async_trait]
impl AdminAccountStore for PostgresAdminAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>> {
        let account =
            sqlx::query_as::<_, AdminAccount>("SELECT * FROM admin_accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let account =
            sqlx::query_as::<_, AdminAccount>("SELECT * FROM admin_accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn insert(&self, account: &AdminAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_accounts (id, name, email, password_hash, role, tokens, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(&account.tokens)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_token(&self, id: Uuid, token: &str) -> Result<()> {
        sqlx::query("UPDATE admin_accounts SET tokens = array_append(tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<()> {
        sqlx::query("UPDATE admin_accounts SET tokens = array_remove(tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
