//! PostgreSQL pool construction.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use draftroom_core::config::DatabaseConfig;
use draftroom_core::error::{AppError, ErrorKind};
use draftroom_core::result::AppResult;

/// Open a connection pool against the configured PostgreSQL instance.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Database unreachable: {e}"), e)
        })?;

    info!("PostgreSQL connection established");
    Ok(pool)
}

/// Replace the password in a connection URL so it can be logged.
fn redact_url(url: &str) -> String {
    let Some((head, tail)) = url.split_once('@') else {
        return url.to_string();
    };
    match head.rsplit_once(':') {
        Some((userinfo, password)) if !password.starts_with("//") => {
            format!("{userinfo}:****@{tail}")
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_hides_password() {
        assert_eq!(
            redact_url("postgres://draftroom:hunter2@db:5432/draftroom"),
            "postgres://draftroom:****@db:5432/draftroom"
        );
    }

    #[test]
    fn test_redact_url_without_credentials() {
        let url = "postgres://localhost:5432/draftroom";
        assert_eq!(redact_url(url), url);
    }
}
