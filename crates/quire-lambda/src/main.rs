use std::env;
use std::sync::Arc;

use quire_export::pdf::ChromiumRenderer;
use quire_lambda::config::{Config, StorageBackend};
use quire_lambda::state::AppState;
use quire_storage::s3::S3Store;
use quire_storage::space::SpaceStore;
use quire_storage::store::ObjectStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    tracing::info!(config = ?config, "configuration loaded");

    let store: Arc<dyn ObjectStore> = match &config.storage {
        StorageBackend::Space { api_key, endpoint } => {
            Arc::new(SpaceStore::new(api_key.clone(), endpoint.clone())?)
        }
        StorageBackend::S3 {
            bucket,
            public_base_url,
        } => {
            let s3 = quire_storage::client::build_client().await;
            Arc::new(S3Store::new(s3, bucket.clone(), public_base_url.clone()))
        }
    };
    let renderer = Arc::new(ChromiumRenderer::new(config.chromium()));

    let app = quire_lambda::app(AppState::new(renderer, store), config.max_body_bytes);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    } else {
        let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
        tracing::info!(addr = %config.listen_addr, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
