pub mod login;
pub mod logout;
pub mod register;
pub mod request_challenge;
pub mod verify_challenge;

pub use login::{admin_login, phone_login};
pub use logout::logout;
pub use register::{register_admin, register_phone, NewPhoneAccount};
pub use request_challenge::request_challenge;
pub use verify_challenge::verify_challenge;
