//! Auth domain data types
//!
//! Roles, submission kinds, and the serializable results returned by auth
//! actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role carried in token claims and stored on accounts.
///
/// Administrative accounts are `admin` or `user`; phone accounts default to
/// their submission kind's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Customer,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Customer => "customer",
            Role::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submission type tag on phone accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum AccountKind {
    Customer,
    Vendor,
}

impl AccountKind {
    /// The role a phone account starts with.
    pub fn default_role(&self) -> Role {
        match self {
            AccountKind::Customer => Role::Customer,
            AccountKind::Vendor => Role::Vendor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customer",
            AccountKind::Vendor => "vendor",
        }
    }
}

/// Result of issuing a phone challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSent {
    pub phone: String,
    /// Delivery is best-effort; a stored code stays verifiable even when
    /// the SMS gateway failed.
    pub delivery_failed: bool,
}

/// Result of a successful login, registration, or completed challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    pub principal_id: Uuid,
    pub role: Role,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles_follow_kind() {
        assert_eq!(AccountKind::Customer.default_role(), Role::Customer);
        assert_eq!(AccountKind::Vendor.default_role(), Role::Vendor);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: Role = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(role, Role::Vendor);
    }
}
