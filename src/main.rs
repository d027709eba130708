//! Payroll API server
//!
//! Configuration comes from an optional YAML file (`PAYROLL_CONFIG`) and the
//! environment (`PORT`, `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASS`,
//! `TOKEN_SECRET`). A `.env` file is read first when present.

use anyhow::Result;
use payroll::config::AppConfig;
use payroll::core::store::RecordStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let store = open_store(&config).await?;

    payroll::server::serve(&config, store).await
}

#[cfg(feature = "mysql")]
async fn open_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>> {
    use payroll::storage::MysqlRecordStore;

    let store = MysqlRecordStore::connect(&config.database.url()).await?;
    tracing::info!(host = %config.database.host, database = %config.database.name, "connected to MySQL");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mysql"))]
async fn open_store(_config: &AppConfig) -> Result<Arc<dyn RecordStore>> {
    use payroll::storage::InMemoryRecordStore;

    tracing::warn!("mysql feature disabled, records are kept in memory only");
    Ok(Arc::new(InMemoryRecordStore::new()))
}
