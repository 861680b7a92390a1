pub mod admin;
pub mod auth;
pub mod photo;
pub mod public;
pub mod vote;
