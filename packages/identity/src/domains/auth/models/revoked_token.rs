use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::kernel::RevokedTokenStore;

/// Revocation records self-destruct after this many hours; anything older
/// is covered by the token's own embedded expiry.
pub const REVOCATION_RETENTION_HOURS: i64 = 24;

/// Revoked bearer token - rejected even while cryptographically valid and
/// within its embedded expiry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevokedToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Whether the record has outlived the retention window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= Duration::hours(REVOCATION_RETENTION_HOURS)
    }
}

/// Postgres-backed revoked token store.
///
/// Expiry is lazy: lookups bound the match to the retention window, and
/// `purge_expired` is available as an out-of-band sweep.
pub struct PostgresRevokedTokenStore {
    pool: PgPool,
}

impl PostgresRevokedTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn retention_cutoff() -> DateTime<Utc> {
        Utc::now() - Duration::hours(REVOCATION_RETENTION_HOURS)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

#[async_trait]
impl RevokedTokenStore for PostgresRevokedTokenStore {
    async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, created_at)
            VALUES ($1, NOW())
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1 AND created_at > $2)",
        )
        .bind(token)
        .bind(Self::retention_cutoff())
        .fetch_one(&self.pool)
        .await?;
        Ok(revoked)
    }

    async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE created_at <= $1")
            .bind(Self::retention_cutoff())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expires_after_retention_window() {
        let now = Utc::now();

        let fresh = RevokedToken {
            token: "t1".to_string(),
            created_at: now - Duration::hours(REVOCATION_RETENTION_HOURS - 1),
        };
        assert!(!fresh.is_expired(now));

        let stale = RevokedToken {
            token: "t2".to_string(),
            created_at: now - Duration::hours(REVOCATION_RETENTION_HOURS + 1),
        };
        assert!(stale.is_expired(now));
    }
}
