use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use textlocal::{TextlocalOptions, TextlocalService};

use crate::config::Config;
use crate::domains::auth::jwt::TokenService;
use crate::domains::auth::models::{
    PostgresAdminAccountStore, PostgresPhoneAccountStore, PostgresRevokedTokenStore,
};

use super::{AdminAccountStore, BaseSmsService, PhoneAccountStore, RevokedTokenStore};

/// Shared dependencies for the identity core.
///
/// Route handlers hold this behind an `Arc` and pass it to the domain
/// actions and the middleware.
pub struct AuthDeps {
    pub admin_accounts: Arc<dyn AdminAccountStore>,
    pub phone_accounts: Arc<dyn PhoneAccountStore>,
    pub revoked_tokens: Arc<dyn RevokedTokenStore>,
    pub sms: Arc<dyn BaseSmsService>,
    pub tokens: TokenService,
    pub admin_token_ttl: Duration,
    pub phone_token_ttl: Duration,
}

impl AuthDeps {
    /// Wire production dependencies from configuration.
    pub fn from_config(config: &Config, pool: PgPool) -> Self {
        let sms = TextlocalSmsService::new(TextlocalService::new(TextlocalOptions {
            api_key: config.textlocal_api_key.clone(),
            sender: config.textlocal_sender.clone(),
        }));

        Self {
            admin_accounts: Arc::new(PostgresAdminAccountStore::new(pool.clone())),
            phone_accounts: Arc::new(PostgresPhoneAccountStore::new(pool.clone())),
            revoked_tokens: Arc::new(PostgresRevokedTokenStore::new(pool)),
            sms: Arc::new(sms),
            tokens: TokenService::new(&config.jwt_secret, config.jwt_issuer.clone()),
            admin_token_ttl: Duration::hours(config.admin_token_ttl_hours),
            phone_token_ttl: Duration::days(config.phone_token_ttl_days),
        }
    }
}

/// Adapter from the Textlocal client to the SMS service trait.
pub struct TextlocalSmsService {
    client: TextlocalService,
}

impl TextlocalSmsService {
    pub fn new(client: TextlocalService) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseSmsService for TextlocalSmsService {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<()> {
        self.client
            .send_sms(phone, message)
            .await
            .map_err(|e| anyhow::anyhow!("Textlocal send failed: {}", e))?;
        Ok(())
    }
}
