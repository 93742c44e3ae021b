use std::fs;
use std::path::Path;

use task_api::application::task_service::TaskServiceImpl;
use task_api::config::AppConfig;
use task_api::domain::repository::TaskRepository;
use task_api::http::routes::tasks;
use task_api::http::routing;
use task_api::infrastructure::sqlite_repo::SqliteTaskRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    prepare_sqlite_file(&config.database_url)?;
    let repo = SqliteTaskRepository::connect(&config.database_url).await?;
    repo.init().await?;
    tracing::info!(database_url = %config.database_url, "storage ready");

    let service = TaskServiceImpl::new(repo);
    let router = routing::app(tasks::router(tasks::AppState { service }));

    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown");
}

// SQLite will not create missing parent directories or, with a plain URL,
// the database file itself.
fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if path.is_empty() {
            return Ok(());
        }
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            fs::OpenOptions::new().create(true).append(true).open(path)?;
        }
    }
    Ok(())
}
