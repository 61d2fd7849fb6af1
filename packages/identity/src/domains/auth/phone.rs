//! Phone number validation for challenge issuance.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::AuthError;

lazy_static! {
    // 10-digit local mobile numbers, first digit 6-9
    static ref MOBILE_REGEX: Regex = Regex::new(r"^[6-9][0-9]{9}$").unwrap();
}

/// Validate a local mobile number.
pub fn validate_mobile(phone: &str) -> Result<(), AuthError> {
    if MOBILE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "Invalid mobile number: {}",
            phone
        )))
    }
}

/// E.164 form without the leading plus, as the SMS gateway expects.
pub fn to_e164_without_plus(phone: &str) -> String {
    format!("91{}", phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_mobiles() {
        for phone in ["9812345678", "6000000000", "7999999999", "8123456780"] {
            assert!(validate_mobile(phone).is_ok(), "{} should be valid", phone);
        }
    }

    #[test]
    fn test_rejects_invalid_mobiles() {
        for phone in [
            "5812345678",   // first digit out of range
            "98123",        // too short
            "98123456789",  // too long
            "98123456ab",   // non-digits
            "+919812345678", // country code included
            "",
        ] {
            assert!(
                matches!(validate_mobile(phone), Err(AuthError::Validation(_))),
                "{} should be rejected",
                phone
            );
        }
    }

    #[test]
    fn test_e164_form_prefixes_country_code() {
        assert_eq!(to_e164_without_plus("9812345678"), "919812345678");
    }
}
