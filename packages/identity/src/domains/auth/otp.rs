//! One-time code generation and challenge state checks.
//!
//! A challenge lives on the phone account record itself: a code and an
//! expiry, overwritten by every new challenge and cleared on successful
//! verification. Per phone the state machine is NONE -> PENDING ->
//! VERIFIED; a new challenge resets it to PENDING.

use chrono::{DateTime, Duration, Utc};
use rand::{CryptoRng, Rng};

use crate::common::AuthError;

/// Codes stay verifiable for ten minutes.
pub const CHALLENGE_TTL_MINUTES: i64 = 10;

/// Draw a 6-digit code uniformly from [100000, 999999].
///
/// The random source is supplied by the caller so challenge issuance never
/// depends on process-wide state.
pub fn generate_code<R: Rng + CryptoRng>(rng: &mut R) -> String {
    rng.gen_range(100_000..=999_999).to_string()
}

/// Expiry for a challenge issued at `now`.
pub fn challenge_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(CHALLENGE_TTL_MINUTES)
}

/// Check a submitted code against the stored challenge.
///
/// Codes are compared as opaque strings, never parsed as integers.
pub fn check_code(
    stored_code: Option<&str>,
    stored_expiry: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let code = stored_code.ok_or(AuthError::ChallengeNotFound)?;
    if code != submitted {
        return Err(AuthError::CodeMismatch);
    }

    let expiry = stored_expiry.ok_or(AuthError::ChallengeNotFound)?;
    if now > expiry {
        return Err(AuthError::ChallengeExpired);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..1000 {
            let code = generate_code(&mut OsRng);
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_check_code_matches() {
        let now = Utc::now();
        let expiry = challenge_expiry(now);

        assert!(check_code(Some("123456"), Some(expiry), "123456", now).is_ok());
    }

    #[test]
    fn test_check_code_mismatch() {
        let now = Utc::now();
        let expiry = challenge_expiry(now);

        let result = check_code(Some("123456"), Some(expiry), "000000", now);
        assert!(matches!(result, Err(AuthError::CodeMismatch)));
    }

    #[test]
    fn test_check_code_expired() {
        let now = Utc::now();
        let expiry = challenge_expiry(now);
        let after_expiry = now + Duration::minutes(CHALLENGE_TTL_MINUTES + 1);

        let result = check_code(Some("123456"), Some(expiry), "123456", after_expiry);
        assert!(matches!(result, Err(AuthError::ChallengeExpired)));
    }

    #[test]
    fn test_check_code_missing_challenge() {
        let now = Utc::now();

        let result = check_code(None, None, "123456", now);
        assert!(matches!(result, Err(AuthError::ChallengeNotFound)));
    }

    #[test]
    fn test_mismatch_reported_before_expiry() {
        // A wrong code against an expired challenge reads as a mismatch,
        // matching the documented check order.
        let now = Utc::now();
        let expired = now - Duration::minutes(1);

        let result = check_code(Some("123456"), Some(expired), "654321", now);
        assert!(matches!(result, Err(AuthError::CodeMismatch)));
    }

    #[test]
    fn test_codes_compared_as_strings() {
        let now = Utc::now();
        let expiry = challenge_expiry(now);

        // "123456" and "0123456" must not be treated as the same number
        let result = check_code(Some("123456"), Some(expiry), "0123456", now);
        assert!(matches!(result, Err(AuthError::CodeMismatch)));
    }
}
