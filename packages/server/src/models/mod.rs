pub mod auth;
pub mod photo;
pub mod results;
pub mod settings;
pub mod shared;
pub mod user;
pub mod vote;
