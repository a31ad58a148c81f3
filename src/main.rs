use std::env;
use std::error::Error;

use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_service::{AppState, Config, TodoStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let pool = SqlitePool::connect(&config.database_url).await?;
    let store = TodoStore::new(pool);
    store.migrate().await?;

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    todo_service::run(listener, AppState { store, config }).await?;
    Ok(())
}
