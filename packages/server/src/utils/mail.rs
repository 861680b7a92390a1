use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery is not configured")]
    NotConfigured,
}

/// Delivers password reset links to users.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_url: &str,
    ) -> Result<(), MailError>;
}

/// Writes reset links to the log instead of sending them.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_url: &str,
    ) -> Result<(), MailError> {
        info!(from = %self.from, to, name, reset_url, "Password reset link issued");
        Ok(())
    }
}

/// Always fails, so callers fall back to handing the link to an administrator.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_password_reset(&self, _: &str, _: &str, _: &str) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Pick the mailer implementation for the given configuration.
pub fn from_config(config: &MailConfig) -> std::sync::Arc<dyn Mailer> {
    if config.enabled {
        std::sync::Arc::new(LogMailer::new(config.from.clone()))
    } else {
        std::sync::Arc::new(DisabledMailer)
    }
}
