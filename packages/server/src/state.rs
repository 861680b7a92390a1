use std::sync::Arc;

use common::storage::PhotoStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::mail::Mailer;
use crate::utils::rate_limit::RateLimiters;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub photo_store: Arc<dyn PhotoStore>,
    pub limiters: Arc<RateLimiters>,
    pub mailer: Arc<dyn Mailer>,
}
