// Connectivity checks
use sqlx::MySqlPool;
use tracing::{error, info};

pub async fn check_db_connection(pool: &MySqlPool, db_label: &str) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => {
            info!("✅ Successfully connected to {}", db_label);
            true
        }
        Err(e) => {
            error!("❌ Failed to connect to {}: {}", db_label, e);
            false
        }
    }
}

/// Renders a database URL for logs with the password masked.
pub fn redact_db_url(db_url: &str) -> String {
    match url::Url::parse(db_url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("****"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}
