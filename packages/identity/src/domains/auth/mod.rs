//! Auth domain - dual-principal bearer tokens and phone challenges
//!
//! Responsibilities:
//! - Signed bearer token issuance and verification
//! - Token revocation with a 24-hour retention window
//! - Phone OTP challenges (issue, overwrite, verify)
//! - Principal resolution across the two account stores

pub mod actions;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod password;
pub mod phone;
pub mod resolver;
pub mod types;

pub use jwt::{Claims, IssuedToken, TokenService};
pub use resolver::{resolve, Principal};
pub use types::{AccountKind, AuthenticatedSession, ChallengeSent, Role};
