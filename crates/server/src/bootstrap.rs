use reliefline_core::config::{AppConfig, ConfigError, LoadOptions};
use reliefline_core::dialogflow::{self, CredentialsError};
use reliefline_db::{connect, migrations, DbPool};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    /// Resolved conversational-AI project id, if configured directly or via
    /// a credentials file. Absence disables session-path logging only.
    pub session_project_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let session_project_id = resolve_project_id(&config)?;
    if let Some(project_id) = &session_project_id {
        info!(
            event_name = "system.bootstrap.dialogflow_project_resolved",
            correlation_id = "bootstrap",
            project_id = %project_id,
            "conversational-AI project linkage configured"
        );
    }

    Ok(Application { config, db_pool, session_project_id })
}

/// An explicitly configured project id wins; otherwise it is extracted from
/// the credentials file when one is configured.
fn resolve_project_id(config: &AppConfig) -> Result<Option<String>, BootstrapError> {
    if let Some(project_id) = &config.dialogflow.project_id {
        return Ok(Some(project_id.clone()));
    }

    match &config.dialogflow.credentials_path {
        Some(path) => Ok(Some(dialogflow::project_id_from_credentials(path)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use reliefline_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn memory_overrides() -> ConfigOverrides {
        ConfigOverrides {
            database_url: Some("sqlite::memory:?cache=shared".to_string()),
            ..ConfigOverrides::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_connects_and_applies_migrations() {
        let app = bootstrap(LoadOptions {
            overrides: memory_overrides(),
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with in-memory database");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('aid_requests', 'insurance_claims')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected submission tables to be available after bootstrap");
        assert_eq!(table_count, 2, "bootstrap should expose both submission tables");
        assert!(app.session_project_id.is_none());

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_resolves_project_id_from_credentials_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{ "project_id": "relief-agent" }"#).expect("write key file");

        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                dialogflow_credentials_path: Some(path),
                ..memory_overrides()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed");

        assert_eq!(app.session_project_id.as_deref(), Some("relief-agent"));
        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_unreadable_credentials() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                dialogflow_credentials_path: Some("/nonexistent/credentials.json".into()),
                ..memory_overrides()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(matches!(result, Err(BootstrapError::Credentials(_))));
    }
}
