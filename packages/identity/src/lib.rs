// Shopfront Identity Core
//
// Issues and revokes bearer credentials, runs the phone challenge flow, and
// resolves which of the two principal stores a verified token belongs to.
// Consumed in-process by the content API's route handlers; no routing or
// CRUD resources live here.

pub mod common;
pub mod config;
pub mod db;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
