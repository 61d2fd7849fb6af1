//! Issue a phone verification challenge.

use chrono::Utc;
use rand::rngs::OsRng;
use tracing::{error, info};

use crate::common::AuthError;
use crate::domains::auth::otp::{challenge_expiry, generate_code, CHALLENGE_TTL_MINUTES};
use crate::domains::auth::phone::{to_e164_without_plus, validate_mobile};
use crate::domains::auth::types::ChallengeSent;
use crate::kernel::{AuthDeps, BaseSmsService, PhoneAccountStore};

/// Issue a challenge for `phone`, overwriting any pending one.
///
/// The account row is upserted so a challenge can precede registration.
/// Delivery is best-effort: if the SMS gateway fails the stored code stays
/// verifiable and the caller still gets a success, with `delivery_failed`
/// set so the code can be relayed out of band.
pub async fn request_challenge(deps: &AuthDeps, phone: &str) -> Result<ChallengeSent, AuthError> {
    validate_mobile(phone)?;

    let code = generate_code(&mut OsRng);
    let expires_at = challenge_expiry(Utc::now());

    let account = deps
        .phone_accounts
        .upsert_challenge(phone, &code, expires_at)
        .await?;
    info!("Challenge stored for account {}", account.id);

    let message = format!(
        "Your Shopfront verification code is {}. It is valid for {} minutes.",
        code, CHALLENGE_TTL_MINUTES
    );

    let delivery_failed = match deps
        .sms
        .send_sms(&to_e164_without_plus(phone), &message)
        .await
    {
        Ok(()) => false,
        Err(e) => {
            error!("Failed to deliver challenge SMS: {}", e);
            true
        }
    };

    Ok(ChallengeSent {
        phone: phone.to_string(),
        delivery_failed,
    })
}
