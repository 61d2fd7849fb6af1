pub mod admin_account;
pub mod phone_account;
pub mod revoked_token;

pub use admin_account::{AdminAccount, PostgresAdminAccountStore};
pub use phone_account::{PhoneAccount, PostgresPhoneAccountStore};
pub use revoked_token::{
    PostgresRevokedTokenStore, RevokedToken, REVOCATION_RETENTION_HOURS,
};
