use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Client address used as the rate-limit key.
///
/// Taken from the first `X-Forwarded-For` entry; falls back to loopback when the
/// header is absent, so direct connections share one bucket.
pub struct ClientIp(pub String);

const FALLBACK_IP: &str = "127.0.0.1";

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip_from(parts)))
    }
}

fn client_ip_from(parts: &Parts) -> String {
    parts
        .headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(FALLBACK_IP)
        .to_string()
}
