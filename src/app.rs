//! Service wiring shared by the binary and the integration tests.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::api;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::store::{MemoryStore, Store, seed_defaults};
use crate::triage::InquiryProcessor;

/// Create the store, seed it when configured and wrap it in a processor.
pub async fn build(config: &ServerConfig) -> Result<Arc<InquiryProcessor>> {
    let store = MemoryStore::new();
    if config.seed_defaults && seed_defaults(store.as_ref()).await? {
        let templates = store.list_templates().await?.len();
        info!(templates, "Default dataset loaded");
    }
    Ok(InquiryProcessor::new(store))
}

/// Serve the REST and live-feed routes on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    processor: Arc<InquiryProcessor>,
    config: &ServerConfig,
) -> Result<()> {
    let addr = listener.local_addr()?;
    let app = api::routes(processor, config.feed_sync_limit);
    info!(%addr, "Support triage server started");
    axum::serve(listener, app).await?;
    Ok(())
}
