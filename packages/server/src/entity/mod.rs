pub mod contest_settings;
pub mod password_reset_token;
pub mod photo;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod vote;
