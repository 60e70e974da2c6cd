use std::sync::Arc;

use mailer::Mailer;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}
