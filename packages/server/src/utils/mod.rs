pub mod hash;
pub mod jwt;
pub mod mail;
pub mod rate_limit;
pub mod token;
